//! Key material types with secure memory handling.
//!
//! The derived content key zeroizes its memory on drop so sensitive data
//! does not persist after an encrypt/decrypt call. Salts and nonces are
//! public KDF/AEAD parameters and are stored in plaintext alongside the
//! ciphertext.

use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of content encryption keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of KDF salts in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of AEAD nonces in bytes (96-bit).
pub const NONCE_LENGTH: usize = 12;

/// Symmetric content key derived from the share password.
///
/// Exists only transiently in memory for the duration of one encrypt or
/// decrypt call. Never logged, persisted, or transmitted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    key: [u8; KEY_LENGTH],
}

impl ContentKey {
    /// Create a content key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl PartialEq for ContentKey {
    fn eq(&self, other: &Self) -> bool {
        self.key.ct_eq(&other.key).into()
    }
}

impl Eq for ContentKey {}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey([REDACTED])")
    }
}

/// Salt for password key derivation.
///
/// Unique per share, generated with a cryptographically secure random
/// source, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfSalt([u8; SALT_LENGTH]);

impl KdfSalt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

/// AEAD nonce, used once per encryption operation.
///
/// Generated fresh inside [`crate::aead::seal`]; a share's nonce is stored
/// with its crypto parameters and reused only to decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce([u8; NONCE_LENGTH]);

impl Nonce {
    /// Generate a random nonce.
    pub(crate) fn generate() -> Self {
        use rand::RngCore;
        let mut nonce = [0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self(nonce)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LENGTH] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_generate_unique() {
        let salt1 = KdfSalt::generate();
        let salt2 = KdfSalt::generate();

        assert_ne!(salt1.as_bytes(), salt2.as_bytes());
    }

    #[test]
    fn test_nonce_generate_unique() {
        let nonce1 = Nonce::generate();
        let nonce2 = Nonce::generate();

        assert_ne!(nonce1.as_bytes(), nonce2.as_bytes());
    }

    #[test]
    fn test_content_key_equality_is_by_value() {
        let key1 = ContentKey::from_bytes([7u8; KEY_LENGTH]);
        let key2 = ContentKey::from_bytes([7u8; KEY_LENGTH]);
        let key3 = ContentKey::from_bytes([8u8; KEY_LENGTH]);

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_content_key_debug_redacted() {
        let key = ContentKey::from_bytes([42u8; KEY_LENGTH]);
        assert_eq!(format!("{:?}", key), "ContentKey([REDACTED])");
    }

    #[test]
    fn test_salt_serde_roundtrip() {
        let salt = KdfSalt::generate();
        let json = serde_json::to_string(&salt).unwrap();
        let restored: KdfSalt = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, salt);
    }
}
