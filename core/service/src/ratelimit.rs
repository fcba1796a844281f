//! Sliding-window abuse throttle shared across the write and read paths.
//!
//! Counters live behind the [`CounterStore`] trait so budgets are enforced
//! across every service instance, not per process. Keys are composed as
//! `ratelimit:{operation}:{caller reference or identifier}`.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use sealshare_common::{Error, Result};
use sealshare_store::CounterStore;

/// Operation names used in counter keys.
pub mod ops {
    pub const CREATE_SHARE: &str = "create-share";
    pub const RETRIEVE_SHARE: &str = "get-share";
    pub const ISSUE_IDENTITY: &str = "issue-identity";
}

/// One rate-limit budget: at most `max_attempts` per `window`.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    pub max_attempts: u64,
    pub window: Duration,
}

impl Budget {
    pub const fn new(max_attempts: u64, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }
}

/// The budgets observed by this system.
#[derive(Debug, Clone, Copy)]
pub struct RateBudgets {
    /// Share creation per creator identity.
    pub create_share: Budget,
    /// Retrieval attempts per target identifier.
    pub retrieve_share: Budget,
    /// Identity issuance per network origin.
    pub issue_identity: Budget,
}

impl Default for RateBudgets {
    fn default() -> Self {
        Self {
            create_share: Budget::new(20, Duration::from_secs(60 * 60)),
            retrieve_share: Budget::new(10, Duration::from_secs(15 * 60)),
            issue_identity: Budget::new(5, Duration::from_secs(60 * 60)),
        }
    }
}

/// Windowed rate limiter over a shared counter store.
#[derive(Clone)]
pub struct RateLimiter {
    counters: Arc<dyn CounterStore>,
}

impl RateLimiter {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Consume one attempt from the budget for `(operation, key)`.
    ///
    /// # Errors
    /// - `RateLimited` once the window's budget is exceeded. The caller
    ///   must not perform the guarded operation.
    pub async fn check(&self, operation: &str, key: &str, budget: &Budget) -> Result<()> {
        self.check_at(operation, key, budget, Utc::now()).await
    }

    /// Like [`check`](Self::check) with an explicit clock, for tests.
    pub async fn check_at(
        &self,
        operation: &str,
        key: &str,
        budget: &Budget,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let counter_key = format!("ratelimit:{}:{}", operation, key);
        let count = self
            .counters
            .increment(&counter_key, budget.window, now)
            .await?;

        if count > budget.max_attempts {
            warn!(operation, count, "rate limit exceeded");
            return Err(Error::RateLimited {
                retry_after_secs: budget.window.as_secs(),
            });
        }
        Ok(())
    }
}
