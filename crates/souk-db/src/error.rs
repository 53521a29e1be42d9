//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! SQLite / filesystem error
//!      │
//!      ▼
//! StoreError (this module)  ← adds context and a short wire code
//!      │
//!      ▼
//! ApiError (admin-api)      ← JSON envelope {success:false, error, code}
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found in its collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored document no longer deserializes into its entity type.
    #[error("Corrupt document in {collection}/{id}: {message}")]
    Corrupt {
        collection: String,
        id: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Blob store I/O failure.
    #[error("Blob store error: {0}")]
    Blob(#[from] std::io::Error),

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Short machine-readable code, passed through in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::ConnectionFailed(_) => "connection_failed",
            StoreError::MigrationFailed(_) => "migration_failed",
            StoreError::QueryFailed(_) => "query_failed",
            StoreError::Corrupt { .. } => "corrupt_document",
            StoreError::PoolExhausted => "pool_exhausted",
            StoreError::Blob(_) => "blob_error",
            StoreError::Internal(_) => "internal",
        }
    }
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Document".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_and_code() {
        let err = StoreError::not_found("Category", "c1");
        assert_eq!(err.to_string(), "Category not found: c1");
        assert_eq!(err.code(), "not_found");
    }
}
