//! Blob store trait definition.

use async_trait::async_trait;

use sealshare_common::{BlobPath, Result};

/// Content-addressed storage for share ciphertext.
///
/// Only ciphertext ever passes through this interface; the store never
/// holds key material or plaintext.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store ciphertext at `path`.
    ///
    /// # Preconditions
    /// - `path` must not already hold a blob (no overwrite: a share's
    ///   ciphertext is written exactly once)
    ///
    /// # Errors
    /// - `Storage` if the path is already occupied or the write fails
    async fn put(&self, path: &BlobPath, data: Vec<u8>) -> Result<()>;

    /// Fetch the ciphertext at `path`.
    ///
    /// # Errors
    /// - `NotFound` if no blob exists at the path
    async fn get(&self, path: &BlobPath) -> Result<Vec<u8>>;

    /// Remove the blob at `path`. Idempotent: removing a missing blob
    /// succeeds, so reclamation passes can be retried safely.
    async fn delete(&self, path: &BlobPath) -> Result<()>;

    /// Check whether a blob exists at `path`.
    async fn exists(&self, path: &BlobPath) -> Result<bool>;
}
