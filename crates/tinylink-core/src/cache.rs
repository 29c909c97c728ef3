use crate::code::ShortCode;
use crate::error::CacheError;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A best-effort bidirectional accelerator in front of durable storage.
///
/// Both the code-to-URL and URL-to-code directions are independent,
/// TTL-bounded mappings. Entries are advisory: they are populated, never required,
/// and expiry or backend failure degrades to a durable-store lookup with
/// no correctness loss. Callers must treat `Err` as a miss.
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Looks up the normalized URL for a code. `Ok(None)` on miss.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Looks up the code for a normalized URL. `Ok(None)` on miss.
    async fn get_code(&self, normalized_url: &str) -> Result<Option<ShortCode>>;

    /// Stores the code→URL mapping with the backend's TTL.
    async fn put_url(&self, code: &ShortCode, normalized_url: &str) -> Result<()>;

    /// Stores the URL→code mapping with the backend's TTL.
    async fn put_code(&self, normalized_url: &str, code: &ShortCode) -> Result<()>;

    /// Stores both directions of the mapping.
    async fn put_both(&self, code: &ShortCode, normalized_url: &str) -> Result<()> {
        self.put_url(code, normalized_url).await?;
        self.put_code(normalized_url, code).await
    }
}
