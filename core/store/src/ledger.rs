//! Share ledger trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::record::ShareRecord;
use sealshare_common::{OwnerRef, Result};

/// CRUD and query operations over share records.
///
/// Implementations must make per-record mutation atomic at the storage
/// layer: `increment_access` is a single conditional update, not a
/// read-modify-write in application code, so concurrent retrievals of the
/// same record cannot lose updates.
#[async_trait]
pub trait ShareLedger: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    /// - `SlugConflict` if `custom_slug` collides with a non-deleted record
    /// - `TokenConflict` on the astronomically unlikely token collision;
    ///   the caller regenerates the token and retries
    async fn insert(&self, record: ShareRecord) -> Result<()>;

    /// Look up a record by share token, falling back to custom slug.
    ///
    /// Soft-deleted records are excluded; a deleted record and a wrong
    /// identifier produce the same `NotFound`, so the lookup stage leaks
    /// nothing about tombstones. Expiry and quota are later, separate
    /// checks.
    ///
    /// # Errors
    /// - `NotFound` if no live record matches
    async fn resolve(&self, identifier: &str) -> Result<ShareRecord>;

    /// Atomically add one successful unlock to `access_count`.
    ///
    /// # Postconditions
    /// - Returns the count after the increment
    ///
    /// # Errors
    /// - `NotFound` if the record does not exist
    async fn increment_access(&self, id: Uuid) -> Result<u64>;

    /// Set the soft-delete tombstone. Idempotent: repeating the call
    /// leaves the original `deleted_at` in place.
    ///
    /// # Errors
    /// - `NotFound` if the record does not exist
    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<()>;

    /// List all live records created by `owner`, newest first.
    async fn list_by_owner(&self, owner: &OwnerRef) -> Result<Vec<ShareRecord>>;

    /// Physically remove records that are tombstoned or expired as of
    /// `now`, returning them so the caller can reclaim blob storage.
    async fn purge_reclaimable(&self, now: DateTime<Utc>) -> Result<Vec<ShareRecord>>;
}
