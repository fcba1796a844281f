//! Anonymous owner identity issuance.
//!
//! An owner reference is a 32-byte random pseudo-identity handed to a
//! caller before their first share. It scopes rate limiting and listing;
//! it grants nothing on the retrieval path.

use tracing::debug;

use crate::ratelimit::{ops, Budget, RateLimiter};
use sealshare_common::{OwnerRef, Result};

/// Issue a fresh owner reference for a caller.
///
/// Issuance itself is rate-limited per network origin so identities
/// cannot be minted to launder per-owner creation budgets.
///
/// # Errors
/// - `RateLimited` if the origin exceeded its issuance budget
pub async fn issue_owner_ref(
    limiter: &RateLimiter,
    budget: &Budget,
    origin: &str,
) -> Result<OwnerRef> {
    limiter.check(ops::ISSUE_IDENTITY, origin, budget).await?;

    let owner = OwnerRef::generate();
    debug!(origin, "issued owner reference");
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use sealshare_store::MemoryCounterStore;

    #[tokio::test]
    async fn test_issue_unique_identities() {
        let limiter = RateLimiter::new(Arc::new(MemoryCounterStore::new()));
        let budget = Budget::new(5, Duration::from_secs(3600));

        let a = issue_owner_ref(&limiter, &budget, "203.0.113.7").await.unwrap();
        let b = issue_owner_ref(&limiter, &budget, "203.0.113.7").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_issuance_is_rate_limited_per_origin() {
        let limiter = RateLimiter::new(Arc::new(MemoryCounterStore::new()));
        let budget = Budget::new(5, Duration::from_secs(3600));

        for _ in 0..5 {
            issue_owner_ref(&limiter, &budget, "203.0.113.7").await.unwrap();
        }
        assert!(issue_owner_ref(&limiter, &budget, "203.0.113.7").await.is_err());

        // A different origin still has its own budget.
        assert!(issue_owner_ref(&limiter, &budget, "198.51.100.2").await.is_ok());
    }
}
