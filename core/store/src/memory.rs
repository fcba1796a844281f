//! In-memory backends for testing and single-process development.
//!
//! All data is lost on drop. These backends satisfy the atomicity
//! contracts by taking one write lock per mutation; they do not satisfy
//! the shared-durable-state requirement for multi-instance deployments.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

use async_trait::async_trait;

use crate::blob::BlobStore;
use crate::counter::CounterStore;
use crate::ledger::ShareLedger;
use crate::record::ShareRecord;
use sealshare_common::{BlobPath, Error, OwnerRef, Result};

/// In-memory share ledger.
#[derive(Default)]
pub struct MemoryLedger {
    records: Arc<RwLock<HashMap<Uuid, ShareRecord>>>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareLedger for MemoryLedger {
    async fn insert(&self, record: ShareRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();

        // Tokens are globally unique and immutable, so a tombstoned record
        // still reserves its token.
        if records.values().any(|r| r.token == record.token) {
            return Err(Error::TokenConflict);
        }

        if let Some(slug) = &record.custom_slug {
            if records
                .values()
                .any(|r| !r.is_deleted() && r.custom_slug.as_ref() == Some(slug))
            {
                return Err(Error::SlugConflict(slug.to_string()));
            }
        }

        records.insert(record.id, record);
        Ok(())
    }

    async fn resolve(&self, identifier: &str) -> Result<ShareRecord> {
        let records = self.records.read().unwrap();

        let hit = records
            .values()
            .filter(|r| !r.is_deleted())
            .find(|r| r.token.as_str() == identifier)
            .or_else(|| {
                records.values().filter(|r| !r.is_deleted()).find(|r| {
                    r.custom_slug
                        .as_ref()
                        .is_some_and(|slug| slug.as_str() == identifier)
                })
            });

        hit.cloned()
            .ok_or_else(|| Error::NotFound("Share not found or has been deleted".to_string()))
    }

    async fn increment_access(&self, id: Uuid) -> Result<u64> {
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Share not found or has been deleted".to_string()))?;

        record.access_count += 1;
        Ok(record.access_count)
    }

    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Share not found or has been deleted".to_string()))?;

        if record.deleted_at.is_none() {
            record.deleted_at = Some(now);
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner: &OwnerRef) -> Result<Vec<ShareRecord>> {
        let records = self.records.read().unwrap();

        let mut matches: Vec<ShareRecord> = records
            .values()
            .filter(|r| !r.is_deleted() && &r.owner == owner)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn purge_reclaimable(&self, now: DateTime<Utc>) -> Result<Vec<ShareRecord>> {
        let mut records = self.records.write().unwrap();

        let reclaimable: Vec<Uuid> = records
            .values()
            .filter(|r| r.is_reclaimable(now))
            .map(|r| r.id)
            .collect();

        let mut purged = Vec::with_capacity(reclaimable.len());
        for id in reclaimable {
            if let Some(record) = records.remove(&id) {
                purged.push(record);
            }
        }
        Ok(purged)
    }
}

/// In-memory blob store.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    /// Create a new empty blob store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &BlobPath, data: Vec<u8>) -> Result<()> {
        let mut blobs = self.blobs.write().unwrap();
        if blobs.contains_key(path.as_str()) {
            return Err(Error::Storage(format!("Blob already exists: {}", path)));
        }
        blobs.insert(path.as_str().to_string(), data);
        Ok(())
    }

    async fn get(&self, path: &BlobPath) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .unwrap()
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Blob not found: {}", path)))
    }

    async fn delete(&self, path: &BlobPath) -> Result<()> {
        self.blobs.write().unwrap().remove(path.as_str());
        Ok(())
    }

    async fn exists(&self, path: &BlobPath) -> Result<bool> {
        Ok(self.blobs.read().unwrap().contains_key(path.as_str()))
    }
}

#[derive(Debug, Clone, Copy)]
struct CounterWindow {
    count: u64,
    reset_at: DateTime<Utc>,
}

/// In-memory windowed counter store.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: Arc<RwLock<HashMap<String, CounterWindow>>>,
}

impl MemoryCounterStore {
    /// Create a new empty counter store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str, window: Duration, now: DateTime<Utc>) -> Result<u64> {
        let mut counters = self.counters.write().unwrap();
        let window = chrono::Duration::seconds(window.as_secs() as i64);

        let entry = counters
            .entry(key.to_string())
            .and_modify(|w| {
                if now >= w.reset_at {
                    w.count = 1;
                    w.reset_at = now + window;
                } else {
                    w.count += 1;
                }
            })
            .or_insert(CounterWindow {
                count: 1,
                reset_at: now + window,
            });

        Ok(entry.count)
    }
}
