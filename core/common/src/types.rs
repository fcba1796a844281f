//! Domain identifier types used throughout SealShare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random bytes in a share token (256 bits of entropy,
/// hex-encoded to 64 characters).
pub const TOKEN_BYTES: usize = 32;

/// Number of random bytes in an owner reference.
pub const OWNER_REF_BYTES: usize = 32;

/// High-entropy public lookup key for a share.
///
/// Tokens are globally unique and immutable after creation. They are the
/// default identifier embedded in share links; the password is never part
/// of the link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareToken(String);

impl ShareToken {
    /// Generate a fresh random token from a cryptographically secure source.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse an existing hex-encoded token.
    ///
    /// # Errors
    /// - Returns error if the string is not exactly `TOKEN_BYTES * 2`
    ///   lowercase hex characters
    pub fn parse(token: &str) -> crate::Result<Self> {
        if token.len() != TOKEN_BYTES * 2
            || !token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(crate::Error::Validation(
                "Share token must be 64 lowercase hex characters".to_string(),
            ));
        }
        Ok(Self(token.to_string()))
    }

    /// Get the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-chosen human-readable alias for a share.
///
/// Unique among non-deleted records; a slug becomes available again once
/// the share holding it is soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomSlug(String);

impl CustomSlug {
    /// Validate and create a custom slug.
    ///
    /// # Preconditions
    /// - 3 to 64 characters
    /// - Lowercase letters, digits, `-` and `_` only
    ///
    /// # Errors
    /// - Returns error if the slug violates the charset or length bounds
    pub fn new(slug: impl Into<String>) -> crate::Result<Self> {
        let slug = slug.into();
        if slug.len() < 3 || slug.len() > 64 {
            return Err(crate::Error::Validation(
                "Custom slug must be between 3 and 64 characters".to_string(),
            ));
        }
        if !slug
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_'))
        {
            return Err(crate::Error::Validation(
                "Custom slug may only contain lowercase letters, digits, '-' and '_'".to_string(),
            ));
        }
        Ok(Self(slug))
    }

    /// Get the slug string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to the identity that created a share.
///
/// An anonymous pseudo-identity issued by the service. Used only for
/// rate limiting and ownership-scoped listing, never for authorizing
/// retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef(String);

impl OwnerRef {
    /// Generate a fresh anonymous owner reference.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; OWNER_REF_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse an existing hex-encoded owner reference.
    ///
    /// # Errors
    /// - Returns `InvalidIdentity` if the string is not exactly
    ///   `OWNER_REF_BYTES * 2` lowercase hex characters
    pub fn parse(owner: &str) -> crate::Result<Self> {
        if owner.len() != OWNER_REF_BYTES * 2
            || !owner.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(crate::Error::InvalidIdentity(
                "Owner reference must be 64 lowercase hex characters".to_string(),
            ));
        }
        Ok(Self(owner.to_string()))
    }

    /// Get the owner reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path into the blob store holding one share's ciphertext.
///
/// Composed as `{token}/{original_name}` so blob keys never collide across
/// shares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobPath(String);

impl BlobPath {
    /// Build the blob path for a share's file payload.
    ///
    /// # Preconditions
    /// - `name` must be non-empty and must not contain path separators or
    ///   parent references
    ///
    /// # Errors
    /// - Returns error if the file name is invalid
    pub fn for_share(token: &ShareToken, name: &str) -> crate::Result<Self> {
        if name.is_empty() {
            return Err(crate::Error::Validation(
                "File name cannot be empty".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(crate::Error::Validation(
                "File name cannot contain path separators".to_string(),
            ));
        }
        Ok(Self(format!("{}/{}", token.as_str(), name)))
    }

    /// Get the path components: `(token, file name)`.
    pub fn components(&self) -> (&str, &str) {
        // Constructed as exactly two components in for_share.
        self.0.split_once('/').unwrap_or((&self.0, ""))
    }

    /// Get the path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
