//! Windowed counter store trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use sealshare_common::Result;

/// Atomic increment-with-expiry counters backing the rate limiter.
///
/// A counter belongs to a fixed window: the first increment after the
/// previous window elapsed starts a new one. Counts must live in shared
/// durable state when multiple service instances run, because budgets are
/// enforced across the fleet, not per process.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `key` within its current
    /// window, starting a new window if the previous one has elapsed.
    ///
    /// # Postconditions
    /// - Returns the count within the current window, including this call
    async fn increment(&self, key: &str, window: Duration, now: DateTime<Utc>) -> Result<u64>;
}
