mod local;

pub use local::LocalStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A store for opaque blobs keyed by relative paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write a new object without ever replacing an existing one. When `key`
    /// is taken, a numbered variant is used instead. Returns the key written.
    async fn insert(&self, key: &str, data: Bytes) -> Result<String, StoreError>;

    /// Delete an object. No-op if absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// -- Configuration --

pub const DEFAULT_CONTENT_DIR: &str = "uploads";

/// Configuration for the content directory.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory uploaded files are written to and served from.
    pub content_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
        }
    }
}

// -- Factory --

/// Create the content directory if needed and return a store rooted there.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    std::fs::create_dir_all(&config.content_dir).map_err(|e| {
        StoreError::Internal(format!("mkdir {}: {e}", config.content_dir.display()))
    })?;
    Ok(Arc::new(LocalStore::new(config)))
}
