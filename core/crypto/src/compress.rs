//! Lossless compression pre-pass.
//!
//! Compression is applied to plaintext *before* encryption, never the
//! reverse, so attacker-controlled ciphertext cannot leak structure through
//! a compression oracle. The ratio is a best-effort optimization: when LZ4
//! does not shrink the payload, the plaintext is stored uncompressed and
//! the record says so.

use serde::{Deserialize, Serialize};

use sealshare_common::{Error, Result};

/// Compression applied to a share's plaintext before encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionScheme {
    /// Plaintext stored as-is.
    None,
    /// LZ4 block compression with a prepended size header.
    Lz4,
}

/// Compress plaintext, falling back to the original when compression
/// does not help.
pub fn compress(plaintext: &[u8]) -> (CompressionScheme, Vec<u8>) {
    let compressed = lz4_flex::compress_prepend_size(plaintext);
    if compressed.len() < plaintext.len() {
        (CompressionScheme::Lz4, compressed)
    } else {
        (CompressionScheme::None, plaintext.to_vec())
    }
}

/// Reverse the compression pre-pass after decryption.
///
/// # Errors
/// - Returns [`Error::CorruptedRecord`] if decompression fails. Decryption
///   already authenticated the bytes, so a failure here means the record
///   was written inconsistently.
pub fn decompress(scheme: CompressionScheme, data: &[u8]) -> Result<Vec<u8>> {
    match scheme {
        CompressionScheme::None => Ok(data.to_vec()),
        CompressionScheme::Lz4 => lz4_flex::decompress_size_prepended(data)
            .map_err(|e| Error::CorruptedRecord(format!("Decompression failed: {}", e))),
    }
}
