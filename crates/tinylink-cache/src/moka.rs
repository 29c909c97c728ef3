use crate::DEFAULT_TTL;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tinylink_core::cache::{LinkCache, Result};
use tinylink_core::ShortCode;
use tracing::{debug, trace, warn};

/// Default per-direction entry bound.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// An in-memory bidirectional cache built on Moka.
///
/// Two independent TTL-bounded maps hold the code→URL and URL→code
/// directions. Suitable for single-node deployments where a shared
/// Redis is not worth running.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    code_to_url: Cache<String, String>,
    url_to_code: Cache<String, String>,
}

impl MokaLinkCache {
    /// Creates a cache with the default capacity and 5-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Creates a cache with a custom capacity and TTL.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let build = || {
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build()
        };
        Self {
            code_to_url: build(),
            url_to_code: build(),
        }
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        match self.code_to_url.get(code.as_str()).await {
            Some(url) => {
                debug!(code = %code, "cache hit for code->url");
                Ok(Some(url))
            }
            None => {
                trace!(code = %code, "cache miss for code->url");
                Ok(None)
            }
        }
    }

    async fn get_code(&self, normalized_url: &str) -> Result<Option<ShortCode>> {
        match self.url_to_code.get(normalized_url).await {
            Some(cached) => match ShortCode::parse(&cached) {
                Ok(code) => {
                    debug!(url = normalized_url, code = %code, "cache hit for url->code");
                    Ok(Some(code))
                }
                Err(e) => {
                    warn!(url = normalized_url, error = %e, "cached code is malformed, treating as miss");
                    Ok(None)
                }
            },
            None => {
                trace!(url = normalized_url, "cache miss for url->code");
                Ok(None)
            }
        }
    }

    async fn put_url(&self, code: &ShortCode, normalized_url: &str) -> Result<()> {
        self.code_to_url
            .insert(code.as_str().to_owned(), normalized_url.to_owned())
            .await;
        trace!(code = %code, "cached code->url mapping");
        Ok(())
    }

    async fn put_code(&self, normalized_url: &str, code: &ShortCode) -> Result<()> {
        self.url_to_code
            .insert(normalized_url.to_owned(), code.as_str().to_owned())
            .await;
        trace!(code = %code, "cached url->code mapping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn get_and_put_both_directions() {
        let cache = MokaLinkCache::new();
        let c = code("abc1234");
        let url = "https://example.com/a";

        assert!(cache.get_url(&c).await.unwrap().is_none());
        assert!(cache.get_code(url).await.unwrap().is_none());

        cache.put_both(&c, url).await.unwrap();

        assert_eq!(cache.get_url(&c).await.unwrap().as_deref(), Some(url));
        assert_eq!(cache.get_code(url).await.unwrap(), Some(c));
    }

    #[tokio::test]
    async fn directions_are_independent() {
        let cache = MokaLinkCache::new();
        let c = code("abc1234");
        let url = "https://example.com/a";

        cache.put_url(&c, url).await.unwrap();

        assert!(cache.get_url(&c).await.unwrap().is_some());
        assert!(cache.get_code(url).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MokaLinkCache::with_ttl(100, Duration::from_millis(50));
        let c = code("abc1234");

        cache.put_both(&c, "https://example.com/a").await.unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get_url(&c).await.unwrap().is_none());
        assert!(cache
            .get_code("https://example.com/a")
            .await
            .unwrap()
            .is_none());
    }
}
