use crate::error::ServiceError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tinylink_core::repository::OwnedLink;
use tinylink_core::{ShortCode, UserId};

/// Result of a create-or-get call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOutcome {
    pub code: ShortCode,
    /// Display URL, `base_url + "/" + code`.
    pub short_url: String,
    pub normalized_url: String,
    /// The short link's creation time. When the link already existed
    /// this is the original creation time.
    pub created_at: Timestamp,
    /// True when the URL already had a short link; the caller maps this
    /// to 200 vs 201.
    pub existed: bool,
}

/// Component status probed by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub storage_ok: bool,
    pub cache_ok: bool,
}

/// The engine surface the HTTP gateway consumes.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the existing short link for the URL, or creates one.
    /// Idempotent per normalized URL; always leaves an ownership row for
    /// the calling user.
    async fn create_or_get(
        &self,
        raw_url: &str,
        user: &UserId,
    ) -> Result<CreateOutcome, ServiceError>;

    /// Resolves a short code to its stored URL. Malformed codes and
    /// unknown codes both yield `Ok(None)`; neither is an error.
    async fn resolve(&self, raw_code: &str) -> Result<Option<String>, ServiceError>;

    /// Lists the user's links, most recent association first.
    async fn list(&self, user: &UserId) -> Result<Vec<OwnedLink>, ServiceError>;

    /// Removes the user's association with a code, returning whether it
    /// existed. The short link itself is never deleted.
    async fn remove(&self, user: &UserId, raw_code: &str) -> Result<bool, ServiceError>;

    /// Probes the durable store and the cache.
    async fn health(&self) -> HealthReport;
}
