//! Encryption scheme tagging.
//!
//! Records persist the algorithm they were written with. Early revisions
//! of the system used a repeating-key XOR scheme; those records are
//! refused at read time rather than decrypted. This is a hard cutover, not
//! backward compatibility: no code path ever XOR-decrypts.

use serde::{Deserialize, Serialize};
use std::fmt;

use sealshare_common::{Error, Result};

/// The algorithm a share's ciphertext was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionScheme {
    /// Repeating-key XOR from early revisions. Unretrievable.
    #[serde(rename = "legacy-xor")]
    LegacyXor,
    /// ChaCha20-Poly1305 AEAD, the current standard.
    #[serde(rename = "chacha20poly1305")]
    ChaCha20Poly1305,
}

impl EncryptionScheme {
    /// The scheme every new share is written with.
    pub const CURRENT: Self = Self::ChaCha20Poly1305;

    /// Refuse any scheme weaker than the current AEAD standard.
    ///
    /// # Errors
    /// - Returns `UnsupportedScheme` for legacy variants
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Self::ChaCha20Poly1305 => Ok(()),
            Self::LegacyXor => Err(Error::UnsupportedScheme(self.to_string())),
        }
    }
}

impl fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyXor => write!(f, "legacy-xor"),
            Self::ChaCha20Poly1305 => write!(f, "chacha20poly1305"),
        }
    }
}
