//! Authenticated content encryption using ChaCha20-Poly1305.
//!
//! ChaCha20-Poly1305 provides both confidentiality and authenticity with a
//! 256-bit key and a 96-bit nonce. Each share derives its own key from its
//! own salt, and [`seal`] generates the nonce internally, so a nonce is
//! never reused under the same key: there is exactly one encrypt call per
//! share, ever.

use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    ChaCha20Poly1305,
};

use crate::keys::{ContentKey, Nonce};
use sealshare_common::{Error, Result};

/// Authentication tag size (16 bytes).
pub const TAG_LENGTH: usize = 16;

/// Encrypt plaintext under a freshly generated nonce.
///
/// # Postconditions
/// - Returns the generated nonce and `ciphertext || tag`
/// - The nonce is unique to this call; callers cannot supply one
///
/// # Errors
/// - Returns error if encryption fails
pub fn seal(key: &ContentKey, plaintext: &[u8]) -> Result<(Nonce, Vec<u8>)> {
    let cipher = ChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
    let nonce = Nonce::generate();

    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|_| Error::Crypto("Encryption failed".to_string()))?;

    Ok((nonce, ciphertext))
}

/// Decrypt and authenticate `ciphertext || tag`.
///
/// # Errors
/// - Returns [`Error::AuthenticationFailed`] on tag mismatch. A wrong
///   password (which derives a wrong key) and tampered ciphertext are
///   deliberately indistinguishable.
pub fn open(key: &ContentKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LENGTH {
        return Err(Error::AuthenticationFailed);
    }

    let cipher = ChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));

    cipher
        .decrypt(GenericArray::from_slice(nonce.as_bytes()), ciphertext)
        .map_err(|_| Error::AuthenticationFailed)
}
