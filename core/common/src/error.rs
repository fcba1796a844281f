//! Common error types for SealShare.

use thiserror::Error;

/// Top-level error type for SealShare operations.
///
/// The public-facing variants mirror the retrieval/creation taxonomy:
/// validation problems are safe to surface verbatim, policy failures
/// (`Expired`, `QuotaExhausted`, `WrongPassword`) carry no internal detail,
/// and storage/crypto failures are meant to be logged server-side and
/// surfaced as opaque internal errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input shape or policy bounds. Safe to disclose.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller identity reference is missing or malformed.
    #[error("Invalid caller identity: {0}")]
    InvalidIdentity(String),

    /// Payload exceeds the configured maximum size.
    #[error("Payload too large (limit {limit_bytes} bytes)")]
    PayloadTooLarge { limit_bytes: usize },

    /// Caller exceeded a rate-limit budget for the guarded operation.
    #[error("Rate limited, retry in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Share not found or has been deleted.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Share exists but its expiry timestamp has passed.
    #[error("This share has expired")]
    Expired,

    /// Share exists but its maximum access count has been reached.
    #[error("Maximum access count reached")]
    QuotaExhausted,

    /// Password does not match the stored verifier.
    #[error("Incorrect password")]
    WrongPassword,

    /// Custom slug collides with a live (non-deleted) share.
    #[error("Custom slug already taken: {0}")]
    SlugConflict(String),

    /// Share token collision. Caller regenerates the token and retries.
    #[error("Share token collision")]
    TokenConflict,

    /// AEAD open failed: tag mismatch or wrong key material.
    ///
    /// Wrong-password garbage and tampered ciphertext are deliberately the
    /// same error.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Record is stored with an encryption scheme weaker than the current
    /// standard and is refused at read time.
    #[error("Unsupported encryption scheme: {0}")]
    UnsupportedScheme(String),

    /// Stored data is inconsistent: ciphertext failed authentication after
    /// the verifier accepted the password, or decompression failed.
    #[error("Corrupted record: {0}")]
    CorruptedRecord(String),

    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation exceeded its overall deadline.
    #[error("Operation deadline exceeded")]
    Timeout,
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
