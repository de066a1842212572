//! Blob storage for ingested photos

use async_trait::async_trait;
use std::path::PathBuf;

use crate::utils::{AppError, ErrorCode};

/// Key-addressed binary store
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `key`, replacing anything already there
    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError>;
}

/// Filesystem blob store rooted at a directory (`uploads_dir`)
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a stored blob. Keys are flat file names.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && !key.contains("..");
        if !valid {
            return Err(AppError::validation(format!("Invalid blob key: {}", key)));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        let failed = |e: std::io::Error| {
            AppError::with_message(ErrorCode::BlobWriteFailed, format!("Failed to save {}: {}", key, e))
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(failed)?;
        tokio::fs::write(&path, &bytes).await.map_err(failed)?;

        tracing::debug!(key, size = bytes.len(), "Blob written");
        Ok(())
    }
}
