//! Storage abstractions for SealShare.
//!
//! This module defines the share record data model and trait-based
//! interfaces for the three storage concerns behind the service:
//! the share ledger (record CRUD), the blob store (ciphertext bytes),
//! and the counter store (rate-limit windows).
//!
//! # Design Principles
//! - Backend isolation: no backend-specific logic leaks into the service
//! - Async operations: all I/O operations are async
//! - Atomic mutation: per-record updates happen under a single conditional
//!   update in the backend, never read-modify-write in application code
//! - The in-memory backends exist for tests and single-process development;
//!   multi-instance deployments require shared durable state

pub mod blob;
pub mod counter;
pub mod ledger;
pub mod local;
pub mod memory;
pub mod record;

pub use blob::BlobStore;
pub use counter::CounterStore;
pub use ledger::ShareLedger;
pub use local::LocalBlobStore;
pub use memory::{MemoryBlobStore, MemoryCounterStore, MemoryLedger};
pub use record::{CryptoParams, ShareRecord, StoredPayload};
