//! Memory-hard password verifier.
//!
//! The verifier gates access attempts before any decryption work is done.
//! It is a distinct secret-storage concern from the content encryption key:
//! both use the Argon2id primitive family, but with independent salts, so
//! the stored verifier reveals nothing about the derived key.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{PasswordHasher, PasswordVerifier as _};
use serde::{Deserialize, Serialize};

use crate::kdf::KdfParams;
use sealshare_common::{Error, Result};

/// Stored password verifier in PHC string format.
///
/// The PHC string embeds the algorithm, parameters, and salt, so parameter
/// upgrades never break verification of old records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordVerifier(String);

impl PasswordVerifier {
    /// Hash a password for storage.
    ///
    /// # Preconditions
    /// - `password` must not be empty
    ///
    /// # Errors
    /// - Returns error if password is empty or hashing fails
    pub fn create(password: &[u8], params: &KdfParams) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::Validation("Password cannot be empty".to_string()));
        }

        let argon2 = params.to_argon2(None)?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(password, &salt)
            .map_err(|e| Error::Crypto(format!("Password hashing failed: {}", e)))?;

        Ok(Self(hash.to_string()))
    }

    /// Verify a password against the stored hash.
    ///
    /// Comparison is constant-time.
    ///
    /// # Returns
    /// - `Ok(true)` if the password matches
    /// - `Ok(false)` if it does not
    /// - `Err(_)` if the stored hash is unparseable
    pub fn verify(&self, password: &[u8]) -> Result<bool> {
        let parsed = PasswordHash::new(&self.0)
            .map_err(|e| Error::CorruptedRecord(format!("Invalid password verifier: {}", e)))?;

        // Verification parameters come from the PHC string itself.
        match argon2::Argon2::default().verify_password(password, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Crypto(format!("Password verification failed: {}", e))),
        }
    }

    /// Get the PHC-formatted hash string.
    pub fn as_phc_string(&self) -> &str {
        &self.0
    }
}
