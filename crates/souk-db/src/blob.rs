//! # Blob Store
//!
//! Filesystem-backed object storage for uploaded files. Stands in for a
//! managed object-storage service: the storage root is the "bucket",
//! object keys are `{prefix}/{uuid}.{ext}`, and every stored object is
//! publicly retrievable as `{public_base}/{key}` (the HTTP server mounts
//! the root as static files).
//!
//! ## Upload Flow
//! ```text
//! multipart field bytes
//!      │
//!      ▼
//! ensure_bucket()          ← idempotent create of the root dir
//!      │
//!      ▼
//! put_public(prefix, ext)  ← randomized key, byte write
//!      │
//!      ▼
//! StoredObject { key, public_url }
//! ```
//!
//! No resumable upload, hashing, deduplication, or size enforcement.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;

/// Blob store configuration.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Directory that acts as the storage bucket.
    pub root: PathBuf,

    /// Base URL under which the bucket is served, without trailing slash
    /// (e.g. `http://localhost:8080/files`).
    pub public_base: String,
}

impl BlobConfig {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        BlobConfig {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Handle to a stored object.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Object key relative to the bucket root.
    pub key: String,

    /// Public URL of the object.
    pub public_url: String,
}

/// Filesystem blob store.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
    public_base: String,
}

impl BlobStore {
    pub fn new(config: BlobConfig) -> Self {
        BlobStore {
            root: config.root,
            public_base: config.public_base,
        }
    }

    /// The bucket root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the bucket if it doesn't exist. Safe to race: directory
    /// creation is idempotent.
    pub async fn ensure_bucket(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes bytes under a randomized key inside `prefix` and returns the
    /// object's key and public URL.
    ///
    /// `ext` is the file extension without the dot; when absent the key has
    /// no extension.
    pub async fn put_public(
        &self,
        prefix: &str,
        ext: Option<&str>,
        bytes: &[u8],
    ) -> StoreResult<StoredObject> {
        self.ensure_bucket().await?;

        let name = match ext {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix.trim_matches('/'), name)
        };

        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;

        debug!(key = %key, size = bytes.len(), "Stored blob");

        let public_url = format!("{}/{}", self.public_base, key);
        Ok(StoredObject { key, public_url })
    }

    /// Whether an object exists under `key`.
    pub async fn exists(&self, key: &str) -> bool {
        fs::metadata(self.root.join(key)).await.is_ok()
    }

    /// Checks that the bucket is reachable and writable.
    pub async fn health_check(&self) -> bool {
        self.ensure_bucket().await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
