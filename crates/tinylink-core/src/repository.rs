use crate::code::ShortCode;
use crate::error::StorageError;
use crate::user::UserId;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for durable storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The authoritative code→URL mapping. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: ShortCode,
    /// Canonical URL form, unique across all short links.
    pub normalized_url: String,
    pub created_at: Timestamp,
}

/// A user's claim on a short code. Composite key (user, code); a link
/// may have zero or many owners, all sharing one code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    pub user_id: UserId,
    pub code: ShortCode,
    pub created_at: Timestamp,
}

/// An ownership row joined to its short link, as returned by listings.
/// `created_at` is the association time, not the link creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedLink {
    pub code: ShortCode,
    pub normalized_url: String,
    pub created_at: Timestamp,
}

/// Durable store for [`ShortLink`] rows.
///
/// The uniqueness constraint on `normalized_url` enforced by
/// implementations, not any application-level pre-check, is the sole
/// arbiter of "one short link per URL" under concurrency.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Retrieves the short link for a given code, if any.
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>>;

    /// Retrieves the short link for a normalized URL via the unique index.
    async fn get_by_normalized_url(&self, normalized_url: &str) -> Result<Option<ShortLink>>;

    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Persists a new short link together with its first ownership row in
    /// one durable transaction, so a link is never left ownerless.
    ///
    /// Returns `Err(Conflict)` when either the code or the normalized URL
    /// already exists.
    async fn insert_with_owner(&self, link: &ShortLink, owner: &Ownership) -> Result<()>;
}

/// Durable store for [`Ownership`] rows.
#[async_trait]
pub trait OwnershipStore: Send + Sync + 'static {
    /// Checks whether the (user, code) association exists.
    async fn ownership_exists(&self, user: &UserId, code: &ShortCode) -> Result<bool>;

    /// Inserts an ownership row. Returns `Err(Conflict)` when the
    /// (user, code) pair is already present.
    async fn insert_ownership(&self, owner: &Ownership) -> Result<()>;

    /// Deletes exactly the (user, code) row if present, returning whether
    /// it existed. Never touches the short link itself.
    async fn delete_ownership(&self, user: &UserId, code: &ShortCode) -> Result<bool>;

    /// Lists the user's associations joined to their links, most recent
    /// association first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<OwnedLink>>;
}
