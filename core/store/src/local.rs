//! Local filesystem blob store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::blob::BlobStore;
use sealshare_common::{BlobPath, Error, Result};

/// Blob store backed by a local directory.
///
/// Lays blobs out as `{root}/{token}/{original_name}`, mirroring the
/// logical blob path. Suitable for a single-node deployment or
/// development; ciphertext only, never plaintext.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at `root`.
    ///
    /// # Postconditions
    /// - Root directory is created if it doesn't exist
    ///
    /// # Errors
    /// - Invalid path or permission denied
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        Ok(Self { root })
    }

    fn to_fs_path(&self, path: &BlobPath) -> PathBuf {
        let (token, name) = path.components();
        self.root.join(token).join(name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &BlobPath, data: Vec<u8>) -> Result<()> {
        let fs_path = self.to_fs_path(path);

        if fs_path.exists() {
            return Err(Error::Storage(format!("Blob already exists: {}", path)));
        }

        if let Some(parent) = fs_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&fs_path, &data).await?;
        debug!(blob = %path, bytes = data.len(), "blob written");
        Ok(())
    }

    async fn get(&self, path: &BlobPath) -> Result<Vec<u8>> {
        let fs_path = self.to_fs_path(path);

        if !fs_path.exists() {
            return Err(Error::NotFound(format!("Blob not found: {}", path)));
        }

        Ok(fs::read(&fs_path).await?)
    }

    async fn delete(&self, path: &BlobPath) -> Result<()> {
        let fs_path = self.to_fs_path(path);

        if fs_path.exists() {
            fs::remove_file(&fs_path).await?;
            // Drop the per-share directory if this was its last blob.
            if let Some(parent) = fs_path.parent() {
                let _ = fs::remove_dir(parent).await;
            }
        }
        Ok(())
    }

    async fn exists(&self, path: &BlobPath) -> Result<bool> {
        Ok(self.to_fs_path(path).exists())
    }
}
