use crate::DEFAULT_TTL;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tinylink_core::cache::{LinkCache, Result};
use tinylink_core::error::CacheError;
use tinylink_core::ShortCode;
use tracing::{debug, trace, warn};

const CODE_TO_URL_PREFIX: &str = "code:";
const URL_TO_CODE_PREFIX: &str = "url:";

/// A Redis-backed bidirectional cache.
///
/// Values are stored as plain strings under `code:` and `url:` key
/// prefixes, each with the configured TTL.
#[derive(Debug, Clone)]
pub struct RedisLinkCache {
    conn: redis::aio::MultiplexedConnection,
    ttl: Duration,
}

impl RedisLinkCache {
    /// Creates a Redis cache with the default 5-minute TTL.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_ttl(conn, DEFAULT_TTL)
    }

    /// Creates a Redis cache with a custom TTL.
    pub fn with_ttl(conn: redis::aio::MultiplexedConnection, ttl: Duration) -> Self {
        Self { conn, ttl }
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, self.ttl.as_secs())
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl LinkCache for RedisLinkCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = format!("{CODE_TO_URL_PREFIX}{code}");
        match self.get_value(&key).await? {
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
        let key = format!("{URL_TO_CODE_PREFIX}{normalized_url}");
        match self.get_value(&key).await? {
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
        let key = format!("{CODE_TO_URL_PREFIX}{code}");
        self.set_value(&key, normalized_url).await?;
        trace!(code = %code, "cached code->url mapping");
        Ok(())
    }

    async fn put_code(&self, normalized_url: &str, code: &ShortCode) -> Result<()> {
        let key = format!("{URL_TO_CODE_PREFIX}{normalized_url}");
        self.set_value(&key, code.as_str()).await?;
        trace!(code = %code, "cached url->code mapping");
        Ok(())
    }
}
