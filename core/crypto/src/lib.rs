//! Cryptographic primitives for SealShare.
//!
//! This module provides:
//! - Password key derivation using Argon2id
//! - Authenticated content encryption using ChaCha20-Poly1305
//! - A memory-hard password verifier, distinct from the encryption key
//! - A lossless compression pre-pass (compress-then-encrypt)
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext, password, or key material is ever logged
//! - Constant-time operations for sensitive comparisons
//! - One encrypt call per share: nonces are generated inside `seal` and
//!   can never be supplied by callers

pub mod aead;
pub mod compress;
pub mod kdf;
pub mod keys;
pub mod scheme;
pub mod verifier;

pub use aead::{open, seal};
pub use compress::{compress, decompress, CompressionScheme};
pub use kdf::{derive_key, KdfParams};
pub use keys::{ContentKey, KdfSalt, Nonce};
pub use scheme::EncryptionScheme;
pub use verifier::PasswordVerifier;
