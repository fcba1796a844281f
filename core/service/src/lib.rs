//! The SealShare sharing service.
//!
//! Orchestrates key derivation, authenticated encryption, the share
//! ledger, the blob store, and the rate limiter into the two public
//! operations: creating a share and retrieving one. The service never
//! holds the decryption key beyond a single call and never persists
//! anything that would let it recover plaintext without the password.

pub mod api;
pub mod identity;
pub mod policy;
pub mod ratelimit;
pub mod service;

pub use identity::issue_owner_ref;
pub use policy::{ServiceConfig, SharePolicy};
pub use ratelimit::{Budget, RateBudgets, RateLimiter};
pub use service::{
    CreatedShare, NewShare, RetrievedContent, RetrievedShare, ShareMetadata, SharePayload,
    ShareSummary, SharingService,
};
