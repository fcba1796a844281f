//! Wire-level request and response shapes.
//!
//! These are the JSON bodies of the two RPC-style operations. Serving
//! them over HTTP (routing, CORS, auth headers) is a separate concern;
//! this module only defines the shapes, their conversion into service
//! inputs, and the error envelope with its status mapping.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::SharePolicy;
use crate::service::{CreatedShare, NewShare, RetrievedContent, RetrievedShare, SharePayload};
use sealshare_common::{Error, Result};

/// Body of `POST create-share`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    pub password: String,
    pub title: String,
    pub payload: PayloadBody,
    pub expiry_minutes: i64,
    #[serde(default)]
    pub custom_slug: Option<String>,
    #[serde(default)]
    pub max_access_count: Option<u64>,
}

/// Either a URL (`content`) or a file, never both.
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file: Option<FileBody>,
}

/// Base64-transported file payload.
#[derive(Debug, Clone, Deserialize)]
pub struct FileBody {
    pub data: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

impl CreateShareRequest {
    /// Convert the wire shape into a service input.
    ///
    /// # Errors
    /// - Validation error if neither or both payload variants are set,
    ///   or the file data is not valid base64
    pub fn into_new_share(self) -> Result<NewShare> {
        let payload = match (self.payload.content, self.payload.file) {
            (Some(content), None) => SharePayload::Url(content),
            (None, Some(file)) => {
                let bytes = BASE64.decode(file.data.as_bytes()).map_err(|_| {
                    Error::Validation("File data is not valid base64".to_string())
                })?;
                SharePayload::File {
                    bytes,
                    name: file.name,
                    content_type: file.content_type,
                }
            }
            _ => {
                return Err(Error::Validation(
                    "Either content or file must be provided".to_string(),
                ))
            }
        };

        Ok(NewShare {
            password: self.password,
            title: self.title,
            payload,
            policy: SharePolicy {
                ttl_minutes: self.expiry_minutes,
                max_access_count: self.max_access_count,
            },
            custom_slug: self.custom_slug,
        })
    }
}

/// Body of a successful `create-share` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareResponse {
    pub share_link: String,
    pub share_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_slug: Option<String>,
}

impl CreateShareResponse {
    /// Build the response, embedding the slug (when present) or the token
    /// in the link. The password and key are never part of the link.
    pub fn new(created: CreatedShare, origin: &str) -> Self {
        let path = created
            .custom_slug
            .as_ref()
            .map(|slug| slug.as_str().to_string())
            .unwrap_or_else(|| created.token.as_str().to_string());

        Self {
            share_link: format!("{}/s/{}", origin, path),
            share_token: created.token.as_str().to_string(),
            expires_at: created.expires_at,
            custom_slug: created.custom_slug.map(|slug| slug.to_string()),
        }
    }
}

/// Body of `POST get-share`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetShareRequest {
    /// Share token or custom slug.
    pub identifier: String,
    pub password: String,
}

/// Body of a successful `get-share` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetShareResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub access_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_access_count: Option<u64>,
}

impl From<RetrievedShare> for GetShareResponse {
    fn from(share: RetrievedShare) -> Self {
        let (content, file_data, content_type, file_name) = match share.content {
            RetrievedContent::Text(text) => (Some(text), None, None, None),
            RetrievedContent::File {
                bytes,
                name,
                content_type,
            } => (
                None,
                Some(BASE64.encode(bytes)),
                Some(content_type),
                Some(name),
            ),
        };

        Self {
            title: share.title,
            content,
            file_data,
            content_type,
            file_name,
            expires_at: share.metadata.expires_at,
            access_count: share.metadata.access_count,
            max_access_count: share.metadata.max_access_count,
        }
    }
}

/// Error envelope returned for every failed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Build the envelope for an error.
    ///
    /// Client-attributable failures carry their message verbatim;
    /// everything mapping to 500 is collapsed into an opaque message, the
    /// detail belongs in server-side logs.
    pub fn from_error(error: &Error) -> Self {
        let message = if status_code(error) == 500 {
            "Internal server error".to_string()
        } else {
            error.to_string()
        };
        Self { error: message }
    }
}

/// HTTP status for an error.
pub fn status_code(error: &Error) -> u16 {
    match error {
        Error::Validation(_) | Error::SlugConflict(_) => 400,
        Error::InvalidIdentity(_) | Error::WrongPassword => 401,
        Error::QuotaExhausted => 403,
        Error::NotFound(_) => 404,
        Error::Expired => 410,
        Error::PayloadTooLarge { .. } => 413,
        Error::RateLimited { .. } => 429,
        _ => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_create_request() {
        let body = r#"{
            "password": "correct-horse-1",
            "title": "Doc",
            "payload": {"content": "https://example.org/doc"},
            "expiryMinutes": 1440,
            "customSlug": "launch-notes"
        }"#;

        let request: CreateShareRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.expiry_minutes, 1440);
        assert_eq!(request.custom_slug.as_deref(), Some("launch-notes"));

        let share = request.into_new_share().unwrap();
        assert!(matches!(share.payload, SharePayload::Url(url) if url == "https://example.org/doc"));
    }

    #[test]
    fn test_parse_file_create_request() {
        let body = r#"{
            "password": "correct-horse-1",
            "title": "Report",
            "payload": {"file": {"data": "AQID", "name": "report.pdf", "type": "application/pdf"}},
            "expiryMinutes": 60
        }"#;

        let share: NewShare = serde_json::from_str::<CreateShareRequest>(body)
            .unwrap()
            .into_new_share()
            .unwrap();

        match share.payload {
            SharePayload::File {
                bytes,
                name,
                content_type,
            } => {
                assert_eq!(bytes, vec![1, 2, 3]);
                assert_eq!(name, "report.pdf");
                assert_eq!(content_type, "application/pdf");
            }
            other => panic!("expected file payload, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_rejected() {
        let body = r#"{
            "password": "correct-horse-1",
            "title": "Nothing",
            "payload": {},
            "expiryMinutes": 60
        }"#;

        let result = serde_json::from_str::<CreateShareRequest>(body)
            .unwrap()
            .into_new_share();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_bad_base64_rejected() {
        let body = r#"{
            "password": "correct-horse-1",
            "title": "Report",
            "payload": {"file": {"data": "!!!", "name": "x", "type": "text/plain"}},
            "expiryMinutes": 60
        }"#;

        let result = serde_json::from_str::<CreateShareRequest>(body)
            .unwrap()
            .into_new_share();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_code(&Error::Validation("x".into())), 400);
        assert_eq!(status_code(&Error::SlugConflict("x".into())), 400);
        assert_eq!(status_code(&Error::WrongPassword), 401);
        assert_eq!(status_code(&Error::QuotaExhausted), 403);
        assert_eq!(status_code(&Error::NotFound("x".into())), 404);
        assert_eq!(status_code(&Error::Expired), 410);
        assert_eq!(status_code(&Error::PayloadTooLarge { limit_bytes: 1 }), 413);
        assert_eq!(
            status_code(&Error::RateLimited {
                retry_after_secs: 60
            }),
            429
        );
        assert_eq!(status_code(&Error::CorruptedRecord("x".into())), 500);
        assert_eq!(status_code(&Error::TokenConflict), 500);
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let body = ErrorBody::from_error(&Error::CorruptedRecord("verifier mismatch".into()));
        assert_eq!(body.error, "Internal server error");

        let body = ErrorBody::from_error(&Error::Expired);
        assert_eq!(body.error, "This share has expired");
    }

    #[test]
    fn test_get_share_response_shape() {
        use crate::service::ShareMetadata;

        let share = RetrievedShare {
            title: "Doc".to_string(),
            content: RetrievedContent::Text("https://example.org".to_string()),
            metadata: ShareMetadata {
                expires_at: Utc::now(),
                access_count: 1,
                max_access_count: None,
            },
        };

        let json = serde_json::to_value(GetShareResponse::from(share)).unwrap();
        assert_eq!(json["content"], "https://example.org");
        assert_eq!(json["accessCount"], 1);
        // Absent fields are omitted, not null.
        assert!(json.get("fileData").is_none());
        assert!(json.get("maxAccessCount").is_none());
    }

    #[test]
    fn test_share_link_prefers_slug() {
        use sealshare_common::{CustomSlug, ShareToken};

        let created = CreatedShare {
            token: ShareToken::generate(),
            custom_slug: Some(CustomSlug::new("launch-notes").unwrap()),
            expires_at: Utc::now(),
        };
        let response = CreateShareResponse::new(created, "https://seal.example");
        assert_eq!(response.share_link, "https://seal.example/s/launch-notes");
    }
}
