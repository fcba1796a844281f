//! The sharing service: orchestration of both public operations.
//!
//! The service is a stateless request handler; unrelated shares never
//! contend. The slow steps (key derivation, blob I/O) hold no record-level
//! state: the ledger is touched immediately before the cryptographic work
//! (resolve) and immediately after (increment), never during it.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tokio::task;
use tracing::{error, info, warn};
use uuid::Uuid;

use sealshare_common::{BlobPath, CustomSlug, Error, OwnerRef, Result, ShareToken};
use sealshare_crypto::{
    compress, decompress, derive_key, open, seal, EncryptionScheme, KdfSalt, PasswordVerifier,
};
use sealshare_store::{
    BlobStore, CounterStore, CryptoParams, ShareLedger, ShareRecord, StoredPayload,
};

use crate::identity;
use crate::policy::{self, ServiceConfig, SharePolicy};
use crate::ratelimit::{ops, RateLimiter};

/// Caller-supplied plaintext for a new share.
#[derive(Debug, Clone)]
pub enum SharePayload {
    /// A URL to share. Scheme must be http or https.
    Url(String),
    /// An opaque file with a declared content type.
    File {
        bytes: Vec<u8>,
        name: String,
        content_type: String,
    },
}

impl SharePayload {
    fn plaintext(&self) -> &[u8] {
        match self {
            Self::Url(content) => content.as_bytes(),
            Self::File { bytes, .. } => bytes,
        }
    }
}

/// Everything needed to create one share.
#[derive(Debug, Clone)]
pub struct NewShare {
    pub password: String,
    pub title: String,
    pub payload: SharePayload,
    pub policy: SharePolicy,
    pub custom_slug: Option<String>,
}

/// Public link material returned from share creation.
///
/// Never contains the password or any key material.
#[derive(Debug, Clone)]
pub struct CreatedShare {
    pub token: ShareToken,
    pub custom_slug: Option<CustomSlug>,
    pub expires_at: DateTime<Utc>,
}

/// Non-secret metadata returned alongside retrieved content.
#[derive(Debug, Clone)]
pub struct ShareMetadata {
    pub expires_at: DateTime<Utc>,
    pub access_count: u64,
    pub max_access_count: Option<u64>,
}

/// Decrypted share content.
#[derive(Debug, Clone)]
pub enum RetrievedContent {
    Text(String),
    File {
        bytes: Vec<u8>,
        name: String,
        content_type: String,
    },
}

/// Result of a successful retrieval.
#[derive(Debug, Clone)]
pub struct RetrievedShare {
    pub title: String,
    pub content: RetrievedContent,
    pub metadata: ShareMetadata,
}

/// One row in an owner's share listing. Carries no secret material.
#[derive(Debug, Clone)]
pub struct ShareSummary {
    pub token: ShareToken,
    pub custom_slug: Option<CustomSlug>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub access_count: u64,
    pub max_access_count: Option<u64>,
}

impl From<&ShareRecord> for ShareSummary {
    fn from(record: &ShareRecord) -> Self {
        Self {
            token: record.token.clone(),
            custom_slug: record.custom_slug.clone(),
            title: record.title.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            access_count: record.access_count,
            max_access_count: record.max_access_count,
        }
    }
}

/// Password-gated zero-knowledge content sharing.
///
/// Holds the injected storage backends and the rate limiter. The server
/// side never possesses the decryption key: it is derived from the
/// caller's password for the duration of a single call and dropped.
pub struct SharingService {
    ledger: Arc<dyn ShareLedger>,
    blobs: Arc<dyn BlobStore>,
    limiter: RateLimiter,
    config: ServiceConfig,
}

impl SharingService {
    /// Create a service over the given backends.
    pub fn new(
        ledger: Arc<dyn ShareLedger>,
        blobs: Arc<dyn BlobStore>,
        counters: Arc<dyn CounterStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            ledger,
            blobs,
            limiter: RateLimiter::new(counters),
            config,
        }
    }

    /// Issue an anonymous owner reference for a caller.
    ///
    /// # Errors
    /// - `RateLimited` if the origin exceeded the issuance budget
    pub async fn issue_identity(&self, origin: &str) -> Result<OwnerRef> {
        identity::issue_owner_ref(&self.limiter, &self.config.budgets.issue_identity, origin).await
    }

    /// Create a share.
    ///
    /// # Postconditions
    /// - Ciphertext is persisted (inline or in the blob store) before the
    ///   record is inserted, so no record ever points at unwritten data
    /// - Returns link material only; the password and key never leave
    ///   this call
    ///
    /// # Errors
    /// - `RateLimited`, `Validation`, `PayloadTooLarge`, `SlugConflict`
    /// - `Timeout` if the overall deadline elapses
    pub async fn create_share(&self, owner: &OwnerRef, share: NewShare) -> Result<CreatedShare> {
        tokio::time::timeout(
            self.config.operation_deadline,
            self.create_share_inner(owner, share),
        )
        .await
        .map_err(|_| Error::Timeout)?
    }

    async fn create_share_inner(&self, owner: &OwnerRef, share: NewShare) -> Result<CreatedShare> {
        self.limiter
            .check(
                ops::CREATE_SHARE,
                owner.as_str(),
                &self.config.budgets.create_share,
            )
            .await?;

        policy::validate_password(&share.password)?;
        share.policy.validate()?;
        let custom_slug = share
            .custom_slug
            .as_deref()
            .map(CustomSlug::new)
            .transpose()?;

        if let SharePayload::Url(content) = &share.payload {
            policy::validate_url(content)?;
        }
        let plaintext = share.payload.plaintext();
        if plaintext.len() > self.config.max_payload_bytes {
            return Err(Error::PayloadTooLarge {
                limit_bytes: self.config.max_payload_bytes,
            });
        }

        // Slow password hashing on the blocking pool. The verifier is a
        // separate secret from the encryption key.
        let verifier = {
            let password = share.password.clone();
            let params = self.config.kdf_params.clone();
            task::spawn_blocking(move || PasswordVerifier::create(password.as_bytes(), &params))
                .await
                .map_err(|e| Error::Crypto(format!("Password hashing task failed: {}", e)))??
        };

        let kdf_salt = KdfSalt::generate();
        let key = {
            let password = share.password.clone();
            let params = self.config.kdf_params.clone();
            task::spawn_blocking(move || derive_key(password.as_bytes(), &kdf_salt, &params))
                .await
                .map_err(|e| Error::Crypto(format!("Key derivation task failed: {}", e)))??
        };

        let (compression, compressed) = compress(plaintext);
        let (nonce, ciphertext) = seal(&key, &compressed)?;
        drop(key);

        let token = ShareToken::generate();
        let now = Utc::now();
        let expires_at = now + ChronoDuration::minutes(share.policy.ttl_minutes);

        // Blob before record: a timeout or crash between the two leaves a
        // stray blob (reclaimable), never a record without ciphertext.
        let payload = match &share.payload {
            SharePayload::Url(_) => {
                if ciphertext.len() > self.config.max_inline_bytes {
                    return Err(Error::PayloadTooLarge {
                        limit_bytes: self.config.max_inline_bytes,
                    });
                }
                StoredPayload::InlineText {
                    ciphertext: ciphertext.clone(),
                }
            }
            SharePayload::File {
                name, content_type, ..
            } => {
                let blob_path = BlobPath::for_share(&token, name)?;
                self.blobs.put(&blob_path, ciphertext.clone()).await?;
                StoredPayload::BlobReference {
                    blob_path,
                    content_type: content_type.clone(),
                    original_name: name.clone(),
                }
            }
        };

        let mut record = ShareRecord {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            token,
            custom_slug,
            title: share.title,
            payload,
            password_verifier: verifier,
            crypto_params: CryptoParams {
                scheme: EncryptionScheme::CURRENT,
                kdf: self.config.kdf_params.clone(),
                kdf_salt,
                nonce,
                compression,
            },
            created_at: now,
            expires_at,
            access_count: 0,
            max_access_count: share.policy.max_access_count,
            deleted_at: None,
        };

        match self.ledger.insert(record.clone()).await {
            Ok(()) => {}
            Err(Error::TokenConflict) => {
                // Astronomically unlikely; regenerate and retry exactly once.
                warn!("share token collision, regenerating");
                let fresh = ShareToken::generate();
                if let StoredPayload::BlobReference {
                    blob_path,
                    content_type,
                    original_name,
                } = record.payload.clone()
                {
                    self.blobs.delete(&blob_path).await?;
                    let new_path = BlobPath::for_share(&fresh, &original_name)?;
                    self.blobs.put(&new_path, ciphertext).await?;
                    record.payload = StoredPayload::BlobReference {
                        blob_path: new_path,
                        content_type,
                        original_name,
                    };
                }
                record.token = fresh;
                if let Err(e) = self.ledger.insert(record.clone()).await {
                    self.remove_blob_if_any(&record.payload).await;
                    return Err(e);
                }
            }
            Err(e) => {
                // Don't leave ciphertext without a record.
                self.remove_blob_if_any(&record.payload).await;
                return Err(e);
            }
        }

        info!(share_id = %record.id, expires_at = %record.expires_at, "share created");

        Ok(CreatedShare {
            token: record.token,
            custom_slug: record.custom_slug,
            expires_at: record.expires_at,
        })
    }

    /// Retrieve and decrypt a share.
    ///
    /// Policy checks run against freshly-read state immediately before the
    /// decrypt attempt; the access count increments only after a
    /// successful unlock, so failed attempts never consume quota.
    ///
    /// # Errors
    /// - `RateLimited`, `NotFound`, `Expired`, `QuotaExhausted`,
    ///   `WrongPassword`, `UnsupportedScheme`
    /// - `CorruptedRecord` if decryption fails despite verifier success
    /// - `Timeout` if the overall deadline elapses
    pub async fn retrieve_share(&self, identifier: &str, password: &str) -> Result<RetrievedShare> {
        tokio::time::timeout(
            self.config.operation_deadline,
            self.retrieve_share_inner(identifier, password),
        )
        .await
        .map_err(|_| Error::Timeout)?
    }

    async fn retrieve_share_inner(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<RetrievedShare> {
        self.limiter
            .check(
                ops::RETRIEVE_SHARE,
                identifier,
                &self.config.budgets.retrieve_share,
            )
            .await?;

        let record = self.ledger.resolve(identifier).await?;
        record.check_retrievable(Utc::now())?;
        record.crypto_params.scheme.ensure_supported()?;

        // Verifier gate before any decryption work.
        let password_ok = {
            let verifier = record.password_verifier.clone();
            let password = password.to_string();
            task::spawn_blocking(move || verifier.verify(password.as_bytes()))
                .await
                .map_err(|e| Error::Crypto(format!("Password verification task failed: {}", e)))??
        };
        if !password_ok {
            return Err(Error::WrongPassword);
        }

        let key = {
            let password = password.to_string();
            let salt = record.crypto_params.kdf_salt;
            let params = record.crypto_params.kdf.clone();
            task::spawn_blocking(move || derive_key(password.as_bytes(), &salt, &params))
                .await
                .map_err(|e| Error::Crypto(format!("Key derivation task failed: {}", e)))??
        };

        let ciphertext = match &record.payload {
            StoredPayload::InlineText { ciphertext } => ciphertext.clone(),
            StoredPayload::BlobReference { blob_path, .. } => self.blobs.get(blob_path).await?,
        };

        // The verifier accepted this password, so an authentication
        // failure here means the stored ciphertext is inconsistent.
        let compressed = open(&key, &record.crypto_params.nonce, &ciphertext).map_err(|_| {
            error!(share_id = %record.id, "ciphertext failed authentication after verifier success");
            Error::CorruptedRecord("Ciphertext failed authentication".to_string())
        })?;
        drop(key);

        let plaintext = decompress(record.crypto_params.compression, &compressed)?;

        let access_count = self.ledger.increment_access(record.id).await?;

        let content = match &record.payload {
            StoredPayload::InlineText { .. } => {
                let text = String::from_utf8(plaintext).map_err(|_| {
                    Error::CorruptedRecord("Inline content is not valid UTF-8".to_string())
                })?;
                RetrievedContent::Text(text)
            }
            StoredPayload::BlobReference {
                content_type,
                original_name,
                ..
            } => RetrievedContent::File {
                bytes: plaintext,
                name: original_name.clone(),
                content_type: content_type.clone(),
            },
        };

        info!(share_id = %record.id, access_count, "share accessed");

        Ok(RetrievedShare {
            title: record.title.clone(),
            content,
            metadata: ShareMetadata {
                expires_at: record.expires_at,
                access_count,
                max_access_count: record.max_access_count,
            },
        })
    }

    /// List an owner's live shares, newest first.
    pub async fn list_shares(&self, owner: &OwnerRef) -> Result<Vec<ShareSummary>> {
        let records = self.ledger.list_by_owner(owner).await?;
        Ok(records.iter().map(ShareSummary::from).collect())
    }

    /// Soft-delete a share owned by `owner`.
    ///
    /// The tombstone takes effect immediately; ciphertext is reclaimed
    /// later by [`reclaim_expired`](Self::reclaim_expired).
    ///
    /// # Errors
    /// - `NotFound` if the identifier doesn't resolve or the share belongs
    ///   to someone else (same shape, so ownership isn't probeable)
    pub async fn delete_share(&self, owner: &OwnerRef, identifier: &str) -> Result<()> {
        let record = self.ledger.resolve(identifier).await?;
        if &record.owner != owner {
            return Err(Error::NotFound(
                "Share not found or has been deleted".to_string(),
            ));
        }
        self.ledger.soft_delete(record.id, Utc::now()).await?;
        info!(share_id = %record.id, "share soft-deleted");
        Ok(())
    }

    /// Housekeeping: physically purge tombstoned and expired records and
    /// delete their blobs. Returns the number of records purged.
    ///
    /// Read-time enforcement never depends on this running; it only
    /// reclaims storage.
    pub async fn reclaim_expired(&self) -> Result<usize> {
        let purged = self.ledger.purge_reclaimable(Utc::now()).await?;
        for record in &purged {
            self.remove_blob_if_any(&record.payload).await;
        }
        if !purged.is_empty() {
            info!(purged = purged.len(), "reclaimed expired shares");
        }
        Ok(purged.len())
    }

    async fn remove_blob_if_any(&self, payload: &StoredPayload) {
        if let StoredPayload::BlobReference { blob_path, .. } = payload {
            if let Err(e) = self.blobs.delete(blob_path).await {
                warn!(blob = %blob_path, "failed to remove blob: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealshare_crypto::KdfParams;
    use sealshare_store::{MemoryBlobStore, MemoryCounterStore, MemoryLedger};

    fn fast_kdf() -> KdfParams {
        KdfParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn test_config() -> ServiceConfig {
        ServiceConfig {
            kdf_params: fast_kdf(),
            ..ServiceConfig::default()
        }
    }

    fn service_with(
        config: ServiceConfig,
    ) -> (SharingService, Arc<MemoryLedger>, Arc<MemoryBlobStore>) {
        let ledger = Arc::new(MemoryLedger::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let counters = Arc::new(MemoryCounterStore::new());
        let service = SharingService::new(ledger.clone(), blobs.clone(), counters, config);
        (service, ledger, blobs)
    }

    fn service() -> (SharingService, Arc<MemoryLedger>, Arc<MemoryBlobStore>) {
        service_with(test_config())
    }

    fn url_share(password: &str, url: &str) -> NewShare {
        NewShare {
            password: password.to_string(),
            title: "Doc".to_string(),
            payload: SharePayload::Url(url.to_string()),
            policy: SharePolicy {
                ttl_minutes: 1440,
                max_access_count: None,
            },
            custom_slug: None,
        }
    }

    /// Insert a record directly, bypassing the service, so tests can
    /// control expiry, scheme, and key/verifier consistency.
    async fn insert_raw(
        ledger: &MemoryLedger,
        verify_password: &str,
        seal_password: &str,
        content: &str,
        expires_at: DateTime<Utc>,
        scheme: EncryptionScheme,
    ) -> ShareToken {
        let params = fast_kdf();
        let kdf_salt = KdfSalt::generate();
        let key = derive_key(seal_password.as_bytes(), &kdf_salt, &params).unwrap();
        let (compression, compressed) = compress(content.as_bytes());
        let (nonce, ciphertext) = seal(&key, &compressed).unwrap();
        let token = ShareToken::generate();

        let record = ShareRecord {
            id: Uuid::new_v4(),
            owner: OwnerRef::generate(),
            token: token.clone(),
            custom_slug: None,
            title: "Raw".to_string(),
            payload: StoredPayload::InlineText { ciphertext },
            password_verifier: PasswordVerifier::create(verify_password.as_bytes(), &params)
                .unwrap(),
            crypto_params: CryptoParams {
                scheme,
                kdf: params,
                kdf_salt,
                nonce,
                compression,
            },
            created_at: Utc::now() - ChronoDuration::minutes(60),
            expires_at,
            access_count: 0,
            max_access_count: None,
            deleted_at: None,
        };
        ledger.insert(record).await.unwrap();
        token
    }

    #[tokio::test]
    async fn test_url_share_end_to_end() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();

        let created = service
            .create_share(&owner, url_share("correct-horse-1", "https://example.org/doc"))
            .await
            .unwrap();

        // Token is 64 hex characters (256 bits of entropy).
        assert_eq!(created.token.as_str().len(), 64);
        assert!(created
            .token
            .as_str()
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));

        let retrieved = service
            .retrieve_share(created.token.as_str(), "correct-horse-1")
            .await
            .unwrap();

        assert_eq!(retrieved.title, "Doc");
        assert_eq!(retrieved.metadata.access_count, 1);
        match retrieved.content {
            RetrievedContent::Text(text) => assert_eq!(text, "https://example.org/doc"),
            other => panic!("expected text content, got {:?}", other),
        }

        // A wrong password fails generically and does not consume quota.
        assert!(matches!(
            service
                .retrieve_share(created.token.as_str(), "wrong-horse-9")
                .await,
            Err(Error::WrongPassword)
        ));
        let listed = service.list_shares(&owner).await.unwrap();
        assert_eq!(listed[0].access_count, 1);
    }

    #[tokio::test]
    async fn test_file_share_end_to_end() {
        let (service, _, blobs) = service();
        let owner = OwnerRef::generate();
        let bytes: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();

        let created = service
            .create_share(
                &owner,
                NewShare {
                    password: "file-password".to_string(),
                    title: "Report".to_string(),
                    payload: SharePayload::File {
                        bytes: bytes.clone(),
                        name: "report.pdf".to_string(),
                        content_type: "application/pdf".to_string(),
                    },
                    policy: SharePolicy {
                        ttl_minutes: 60,
                        max_access_count: None,
                    },
                    custom_slug: None,
                },
            )
            .await
            .unwrap();

        // Ciphertext landed in the blob store under the share token.
        let blob_path = BlobPath::for_share(&created.token, "report.pdf").unwrap();
        assert!(blobs.exists(&blob_path).await.unwrap());

        let retrieved = service
            .retrieve_share(created.token.as_str(), "file-password")
            .await
            .unwrap();
        match retrieved.content {
            RetrievedContent::File {
                bytes: got,
                name,
                content_type,
            } => {
                assert_eq!(got, bytes);
                assert_eq!(name, "report.pdf");
                assert_eq!(content_type, "application/pdf");
            }
            other => panic!("expected file content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_quota_boundary() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();

        let mut share = url_share("correct-horse-1", "https://example.org");
        share.policy.max_access_count = Some(1);
        let created = service.create_share(&owner, share).await.unwrap();

        let first = service
            .retrieve_share(created.token.as_str(), "correct-horse-1")
            .await
            .unwrap();
        assert_eq!(first.metadata.access_count, 1);

        assert!(matches!(
            service
                .retrieve_share(created.token.as_str(), "correct-horse-1")
                .await,
            Err(Error::QuotaExhausted)
        ));
    }

    #[tokio::test]
    async fn test_expired_share() {
        let (service, ledger, _) = service();
        let token = insert_raw(
            &ledger,
            "some-password",
            "some-password",
            "https://example.org",
            Utc::now() - ChronoDuration::minutes(1),
            EncryptionScheme::CURRENT,
        )
        .await;

        assert!(matches!(
            service.retrieve_share(token.as_str(), "some-password").await,
            Err(Error::Expired)
        ));
    }

    #[tokio::test]
    async fn test_slug_conflict_and_reuse_after_delete() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();

        let mut share = url_share("correct-horse-1", "https://example.org");
        share.custom_slug = Some("launch-notes".to_string());
        service.create_share(&owner, share.clone()).await.unwrap();

        assert!(matches!(
            service.create_share(&owner, share.clone()).await,
            Err(Error::SlugConflict(_))
        ));

        service.delete_share(&owner, "launch-notes").await.unwrap();
        service.create_share(&owner, share).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();

        // Password too short
        assert!(matches!(
            service
                .create_share(&owner, url_share("short", "https://example.org"))
                .await,
            Err(Error::Validation(_))
        ));

        // TTL out of bounds
        let mut share = url_share("correct-horse-1", "https://example.org");
        share.policy.ttl_minutes = 5;
        assert!(service.create_share(&owner, share).await.is_err());

        // Bad URL scheme
        assert!(matches!(
            service
                .create_share(&owner, url_share("correct-horse-1", "ftp://example.org"))
                .await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_payload_size_cap() {
        let config = ServiceConfig {
            max_payload_bytes: 16,
            ..test_config()
        };
        let (service, _, _) = service_with(config);
        let owner = OwnerRef::generate();

        let result = service
            .create_share(
                &owner,
                NewShare {
                    password: "file-password".to_string(),
                    title: "Big".to_string(),
                    payload: SharePayload::File {
                        bytes: vec![0u8; 17],
                        name: "big.bin".to_string(),
                        content_type: "application/octet-stream".to_string(),
                    },
                    policy: SharePolicy {
                        ttl_minutes: 60,
                        max_access_count: None,
                    },
                    custom_slug: None,
                },
            )
            .await;

        assert!(matches!(result, Err(Error::PayloadTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_create_rate_limit() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();

        for i in 0..20 {
            service
                .create_share(
                    &owner,
                    url_share("correct-horse-1", &format!("https://example.org/{}", i)),
                )
                .await
                .unwrap();
        }

        // 21st create within the window fails; a different identity is fine.
        assert!(matches!(
            service
                .create_share(&owner, url_share("correct-horse-1", "https://example.org/21"))
                .await,
            Err(Error::RateLimited { .. })
        ));
        service
            .create_share(
                &OwnerRef::generate(),
                url_share("correct-horse-1", "https://example.org/other"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_retrieve_rate_limit_per_identifier() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();
        let created = service
            .create_share(&owner, url_share("correct-horse-1", "https://example.org"))
            .await
            .unwrap();

        for _ in 0..10 {
            assert!(matches!(
                service
                    .retrieve_share(created.token.as_str(), "wrong-horse-9")
                    .await,
                Err(Error::WrongPassword)
            ));
        }

        // Budget consumed: even the correct password is throttled now.
        assert!(matches!(
            service
                .retrieve_share(created.token.as_str(), "correct-horse-1")
                .await,
            Err(Error::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn test_legacy_scheme_refused() {
        let (service, ledger, _) = service();
        let token = insert_raw(
            &ledger,
            "some-password",
            "some-password",
            "https://example.org",
            Utc::now() + ChronoDuration::minutes(60),
            EncryptionScheme::LegacyXor,
        )
        .await;

        assert!(matches!(
            service.retrieve_share(token.as_str(), "some-password").await,
            Err(Error::UnsupportedScheme(_))
        ));
    }

    #[tokio::test]
    async fn test_inconsistent_record_is_corrupted() {
        let (service, ledger, _) = service();
        // Verifier accepts the password but the ciphertext was sealed
        // under a different key.
        let token = insert_raw(
            &ledger,
            "verifier-pass",
            "other-password",
            "https://example.org",
            Utc::now() + ChronoDuration::minutes(60),
            EncryptionScheme::CURRENT,
        )
        .await;

        assert!(matches!(
            service.retrieve_share(token.as_str(), "verifier-pass").await,
            Err(Error::CorruptedRecord(_))
        ));

        // The failed unlock consumed no quota.
        let record = ledger.resolve(token.as_str()).await.unwrap();
        assert_eq!(record.access_count, 0);
    }

    #[tokio::test]
    async fn test_delete_share_is_owner_scoped() {
        let (service, _, _) = service();
        let owner = OwnerRef::generate();
        let created = service
            .create_share(&owner, url_share("correct-horse-1", "https://example.org"))
            .await
            .unwrap();

        assert!(matches!(
            service
                .delete_share(&OwnerRef::generate(), created.token.as_str())
                .await,
            Err(Error::NotFound(_))
        ));

        service
            .delete_share(&owner, created.token.as_str())
            .await
            .unwrap();
        assert!(matches!(
            service
                .retrieve_share(created.token.as_str(), "correct-horse-1")
                .await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reclaim_expired_removes_blobs() {
        let (service, ledger, blobs) = service();
        let owner = OwnerRef::generate();

        let created = service
            .create_share(
                &owner,
                NewShare {
                    password: "file-password".to_string(),
                    title: "Old".to_string(),
                    payload: SharePayload::File {
                        bytes: vec![1, 2, 3],
                        name: "old.bin".to_string(),
                        content_type: "application/octet-stream".to_string(),
                    },
                    policy: SharePolicy {
                        ttl_minutes: 60,
                        max_access_count: None,
                    },
                    custom_slug: None,
                },
            )
            .await
            .unwrap();
        let blob_path = BlobPath::for_share(&created.token, "old.bin").unwrap();
        assert!(blobs.exists(&blob_path).await.unwrap());

        // Tombstone, then reclaim.
        service
            .delete_share(&owner, created.token.as_str())
            .await
            .unwrap();
        let purged = service.reclaim_expired().await.unwrap();

        assert_eq!(purged, 1);
        assert!(!blobs.exists(&blob_path).await.unwrap());
        assert!(ledger.resolve(created.token.as_str()).await.is_err());
    }

    #[tokio::test]
    async fn test_issue_identity_rate_limited() {
        let (service, _, _) = service();

        for _ in 0..5 {
            service.issue_identity("203.0.113.7").await.unwrap();
        }
        assert!(matches!(
            service.issue_identity("203.0.113.7").await,
            Err(Error::RateLimited { .. })
        ));
    }
}
