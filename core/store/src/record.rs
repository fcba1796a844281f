//! The persisted share record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sealshare_common::{BlobPath, CustomSlug, Error, OwnerRef, Result, ShareToken};
use sealshare_crypto::{CompressionScheme, EncryptionScheme, KdfParams, KdfSalt, Nonce, PasswordVerifier};

/// Public cryptographic parameters stored alongside the ciphertext.
///
/// Everything here is non-secret: salt, nonce, and KDF parameters are
/// exactly what a holder of the correct password needs to re-derive the
/// key, and nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoParams {
    /// Algorithm tag; legacy variants are refused at read time.
    pub scheme: EncryptionScheme,
    /// KDF parameters in effect when the share was created.
    pub kdf: KdfParams,
    /// Per-share key derivation salt.
    pub kdf_salt: KdfSalt,
    /// The single nonce this share's ciphertext was sealed under.
    pub nonce: Nonce,
    /// Compression applied before encryption.
    pub compression: CompressionScheme,
}

/// Where a share's ciphertext lives.
///
/// Exactly one representation exists per record; the enum makes any other
/// state unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredPayload {
    /// Ciphertext stored directly in the record (URL shares).
    InlineText { ciphertext: Vec<u8> },
    /// Ciphertext stored in the blob store (file shares).
    BlobReference {
        blob_path: BlobPath,
        content_type: String,
        original_name: String,
    },
}

/// One created share.
///
/// Immutable after creation except for `access_count` (incremented by the
/// retrieval path only) and `deleted_at` (set once by soft deletion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Server-generated identifier, never exposed to callers.
    pub id: Uuid,
    /// Creating identity; rate limiting and listing only.
    pub owner: OwnerRef,
    /// Default public lookup key.
    pub token: ShareToken,
    /// Optional human-readable alias, unique among non-deleted records.
    pub custom_slug: Option<CustomSlug>,
    /// Display label. Plaintext, not secret.
    pub title: String,
    /// Ciphertext placement.
    pub payload: StoredPayload,
    /// Memory-hard password hash gating retrieval attempts.
    pub password_verifier: PasswordVerifier,
    /// Public KDF/AEAD parameters.
    pub crypto_params: CryptoParams,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Successful unlocks so far. Never decremented.
    pub access_count: u64,
    /// Access cap; `None` = unlimited.
    pub max_access_count: Option<u64>,
    /// Soft-delete tombstone. Once set, the record is excluded from all
    /// lookups but retained until physical reclamation.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShareRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.max_access_count, Some(max) if self.access_count >= max)
    }

    /// Policy gate for retrieval, evaluated against freshly-read state.
    ///
    /// A record that is deleted, expired, or out of quota is permanently
    /// unretrievable; this is checked on every retrieval, never cached.
    ///
    /// # Errors
    /// - `NotFound` if soft-deleted
    /// - `Expired` if past its expiry timestamp
    /// - `QuotaExhausted` if the access cap is reached
    pub fn check_retrievable(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_deleted() {
            return Err(Error::NotFound("Share not found or has been deleted".to_string()));
        }
        if self.is_expired(now) {
            return Err(Error::Expired);
        }
        if self.is_exhausted() {
            return Err(Error::QuotaExhausted);
        }
        Ok(())
    }

    /// Whether this record is eligible for physical reclamation.
    pub fn is_reclaimable(&self, now: DateTime<Utc>) -> bool {
        self.is_deleted() || self.is_expired(now)
    }
}
