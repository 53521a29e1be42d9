//! Admin API configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use std::env;
use std::path::PathBuf;

use serde::Serialize;

/// Admin API configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the SQLite document store file.
    pub database_path: String,

    /// Directory acting as the blob-store bucket.
    pub storage_root: PathBuf,

    /// Public base URL under which the bucket is served (no trailing
    /// slash). Defaults to `http://localhost:{port}/files`.
    pub public_url_base: String,

    /// Local JSON credential file read by the connectivity diagnostic.
    pub credentials_path: PathBuf,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let http_port: u16 = env::var("ADMIN_API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ADMIN_API_PORT".to_string()))?;

        let config = ApiConfig {
            http_port,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/souk.db".to_string()),

            storage_root: env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./data/files".to_string())
                .into(),

            public_url_base: env::var("PUBLIC_URL_BASE")
                .unwrap_or_else(|_| format!("http://localhost:{http_port}/files"))
                .trim_end_matches('/')
                .to_string(),

            credentials_path: env::var("CREDENTIALS_PATH")
                .unwrap_or_else(|_| "./service-account.json".to_string())
                .into(),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // No env manipulation: just make sure defaults parse.
        let config = ApiConfig::load().unwrap();
        assert!(!config.public_url_base.ends_with('/'));
    }
}
