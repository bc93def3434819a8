use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use crate::{ObjectStore, StoreConfig, StoreError};

/// Numbered variants tried after the requested key before giving up.
const MAX_RENAMES: usize = 100;

pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base_dir: config.content_dir.clone(),
        }
    }

    /// Keys are relative paths made only of normal components.
    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(key);
        let valid = !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(rel))
    }
}

/// `a/photo.png` -> `a/photo-2.png`; the extension is kept so the served
/// content type does not change.
fn numbered(key: &str, n: usize) -> String {
    let (dir, file) = match key.rfind('/') {
        Some(i) => key.split_at(i + 1),
        None => ("", key),
    };
    match file.rfind('.') {
        Some(dot) if dot > 0 => format!("{dir}{}-{n}{}", &file[..dot], &file[dot..]),
        _ => format!("{dir}{file}-{n}"),
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn insert(&self, key: &str, data: Bytes) -> Result<String, StoreError> {
        let first = self.resolve(key)?;
        if let Some(parent) = first.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Internal(format!("mkdir: {e}")))?;
        }

        for attempt in 0..=MAX_RENAMES {
            let candidate = if attempt == 0 {
                key.to_string()
            } else {
                numbered(key, attempt)
            };
            let path = self.resolve(&candidate)?;
            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StoreError::Internal(format!(
                        "create {}: {e}",
                        path.display()
                    )))
                }
            };

            let written = match file.write_all(&data).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(StoreError::Internal(format!("write {}: {e}", path.display())));
            }

            tracing::debug!("stored {} ({} bytes)", path.display(), data.len());
            return Ok(candidate);
        }

        Err(StoreError::Internal(format!(
            "no free name for {key} after {MAX_RENAMES} attempts"
        )))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Internal(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }
}
