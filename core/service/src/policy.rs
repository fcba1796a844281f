//! Share policy bounds and service configuration.

use std::time::Duration;

use sealshare_common::{Error, Result};
use sealshare_crypto::KdfParams;

use crate::ratelimit::RateBudgets;

/// Minimum share lifetime.
pub const MIN_TTL_MINUTES: i64 = 10;

/// Maximum share lifetime (2 days).
pub const MAX_TTL_MINUTES: i64 = 2880;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Caller-supplied policy for one share.
#[derive(Debug, Clone)]
pub struct SharePolicy {
    /// Lifetime in minutes, bounded to [10, 2880].
    pub ttl_minutes: i64,
    /// Access cap; `None` = unlimited.
    pub max_access_count: Option<u64>,
}

impl SharePolicy {
    /// Validate the TTL bounds.
    ///
    /// # Errors
    /// - Returns a validation error outside [10 minutes, 2 days]
    pub fn validate(&self) -> Result<()> {
        if self.ttl_minutes < MIN_TTL_MINUTES || self.ttl_minutes > MAX_TTL_MINUTES {
            return Err(Error::Validation(
                "Expiry must be between 10 minutes and 2 days".to_string(),
            ));
        }
        if self.max_access_count == Some(0) {
            return Err(Error::Validation(
                "Maximum access count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Service-wide configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum raw payload size in bytes.
    pub max_payload_bytes: usize,
    /// Maximum ciphertext size stored inline in a record.
    pub max_inline_bytes: usize,
    /// Overall deadline for one public operation, covering KDF work and
    /// storage I/O.
    pub operation_deadline: Duration,
    /// KDF parameters for new shares. Existing shares keep the parameters
    /// they were created with.
    pub kdf_params: KdfParams,
    /// Rate-limit budgets.
    pub budgets: RateBudgets,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 40 * 1024 * 1024,
            max_inline_bytes: 64 * 1024,
            operation_deadline: Duration::from_secs(30),
            kdf_params: KdfParams::default(),
            budgets: RateBudgets::default(),
        }
    }
}

/// Validate the share password against the minimum length policy.
///
/// Length only; strength estimation is a client concern.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a URL payload uses an http(s) scheme.
pub fn validate_url(content: &str) -> Result<()> {
    let parsed = url::Url::parse(content).map_err(|_| {
        Error::Validation("Invalid URL format. URL must start with http:// or https://".to_string())
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(Error::Validation(
            "Invalid URL format. URL must start with http:// or https://".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_bounds() {
        let ok = SharePolicy {
            ttl_minutes: 1440,
            max_access_count: None,
        };
        assert!(ok.validate().is_ok());

        for ttl in [9, 2881, 0, -5] {
            let policy = SharePolicy {
                ttl_minutes: ttl,
                max_access_count: None,
            };
            assert!(policy.validate().is_err(), "ttl {} should fail", ttl);
        }
    }

    #[test]
    fn test_zero_access_cap_rejected() {
        let policy = SharePolicy {
            ttl_minutes: 60,
            max_access_count: Some(0),
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("correct-horse-1").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_url_schemes() {
        assert!(validate_url("https://example.org/doc").is_ok());
        assert!(validate_url("http://example.org").is_ok());
        assert!(validate_url("ftp://example.org").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
