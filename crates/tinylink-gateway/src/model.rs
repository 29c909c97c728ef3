use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tinylink_core::repository::OwnedLink;
use tinylink_service::CreateOutcome;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub code: String,
    pub short_url: String,
    pub url: String,
    #[serde(with = "timestamp_seconds")]
    pub created_at: Timestamp,
    pub existed: bool,
}

impl From<CreateOutcome> for UrlResponse {
    fn from(outcome: CreateOutcome) -> Self {
        Self {
            code: outcome.code.as_str().to_owned(),
            short_url: outcome.short_url,
            url: outcome.normalized_url,
            created_at: outcome.created_at,
            existed: outcome.existed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlListEntry {
    pub code: String,
    pub short_url: String,
    pub url: String,
    #[serde(with = "timestamp_seconds")]
    pub created_at: Timestamp,
}

impl UrlListEntry {
    pub fn new(link: OwnedLink, base_url: &str) -> Self {
        Self {
            short_url: link.code.to_url(base_url),
            code: link.code.as_str().to_owned(),
            url: link.normalized_url,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: bool,
    pub cache: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
}

/// Timestamps go over the wire as unix seconds, matching how the store
/// persists them.
mod timestamp_seconds {
    use jiff::Timestamp;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(ts.as_second())
    }
}
