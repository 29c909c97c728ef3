use crate::error::ServiceError;
use crate::shortener::{CreateOutcome, HealthReport, Shortener};
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;
use tinylink_core::repository::{OwnedLink, Ownership, ShortLink};
use tinylink_core::{
    normalize_url, CodeGenerator, LinkCache, LinkStore, OwnershipStore, ShortCode, StorageError,
    UserId,
};
use tracing::{debug, error, info, warn};

/// Retry budget for collision-checked code generation. Small on purpose:
/// at a 36^7 keyspace, exhausting it means a broken generator rather
/// than genuine keyspace pressure.
const MAX_COLLISION_RETRIES: usize = 3;

/// The allocation and resolution engine.
///
/// Combines the normalizer, generator, durable store, and cache to
/// implement idempotent create-or-get and public lookup. The durable
/// store's uniqueness constraint on the normalized URL, not any
/// check-then-act sequence here, is the concurrency guard: creation
/// races surface as [`StorageError::Conflict`] and are recovered by
/// re-reading the winning row. Cache failures are absorbed as misses
/// and never fail a caller.
#[derive(Debug, Clone)]
pub struct LinkService<R, C, G> {
    repo: Arc<R>,
    cache: Arc<C>,
    generator: Arc<G>,
    base_url: String,
}

impl<R, C, G> LinkService<R, C, G>
where
    R: LinkStore + OwnershipStore,
    C: LinkCache,
    G: CodeGenerator,
{
    pub fn new(repo: R, cache: C, generator: G, base_url: impl Into<String>) -> Self {
        Self {
            repo: Arc::new(repo),
            cache: Arc::new(cache),
            generator: Arc::new(generator),
            base_url: base_url.into(),
        }
    }

    /// Cache read, degraded to a miss on any backend failure.
    async fn cached_code(&self, normalized_url: &str) -> Option<ShortCode> {
        match self.cache.get_code(normalized_url).await {
            Ok(code) => code,
            Err(e) => {
                warn!(url = normalized_url, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn cached_url(&self, code: &ShortCode) -> Option<String> {
        match self.cache.get_url(code).await {
            Ok(url) => url,
            Err(e) => {
                warn!(code = %code, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Fire-and-forget bidirectional cache population.
    async fn fill_cache(&self, code: &ShortCode, normalized_url: &str) {
        if let Err(e) = self.cache.put_both(code, normalized_url).await {
            warn!(code = %code, error = %e, "failed to populate cache");
        }
    }

    /// Creates the (user, code) association if missing. A concurrent
    /// insert of the same pair surfaces as a conflict and is fine.
    async fn ensure_ownership(&self, user: &UserId, code: &ShortCode) -> Result<(), ServiceError> {
        if self.repo.ownership_exists(user, code).await? {
            return Ok(());
        }

        let owner = Ownership {
            user_id: user.clone(),
            code: code.clone(),
            created_at: Timestamp::now(),
        };
        match self.repo.insert_ownership(&owner).await {
            Ok(()) => Ok(()),
            Err(StorageError::Conflict(_)) => {
                debug!(user = %user, code = %code, "ownership created concurrently");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Generates a code that is unused at check time, within the retry
    /// budget.
    async fn generate_unused_code(&self) -> Result<ShortCode, ServiceError> {
        for attempt in 1..=MAX_COLLISION_RETRIES {
            let code = self.generator.generate();
            if !self.repo.exists(&code).await? {
                return Ok(code);
            }
            debug!(code = %code, attempt, "code collision detected");
        }
        error!(
            retries = MAX_COLLISION_RETRIES,
            "collision retries exhausted; generator or keyspace health needs attention"
        );
        Err(ServiceError::CollisionRetryExhausted)
    }

    fn outcome(&self, link: &ShortLink, existed: bool) -> CreateOutcome {
        CreateOutcome {
            code: link.code.clone(),
            short_url: link.code.to_url(&self.base_url),
            normalized_url: link.normalized_url.clone(),
            created_at: link.created_at,
            existed,
        }
    }
}

#[async_trait]
impl<R, C, G> Shortener for LinkService<R, C, G>
where
    R: LinkStore + OwnershipStore,
    C: LinkCache,
    G: CodeGenerator,
{
    async fn create_or_get(
        &self,
        raw_url: &str,
        user: &UserId,
    ) -> Result<CreateOutcome, ServiceError> {
        let normalized = normalize_url(raw_url)?;

        // Cache hit still goes through the durable store: the row is the
        // proof of existence, the cache entry only names the code.
        if let Some(code) = self.cached_code(&normalized).await {
            match self.repo.get(&code).await? {
                Some(link) => {
                    self.ensure_ownership(user, &link.code).await?;
                    return Ok(self.outcome(&link, true));
                }
                None => {
                    debug!(code = %code, "stale cache entry, falling back to durable lookup");
                }
            }
        }

        if let Some(link) = self.repo.get_by_normalized_url(&normalized).await? {
            self.ensure_ownership(user, &link.code).await?;
            self.fill_cache(&link.code, &normalized).await;
            return Ok(self.outcome(&link, true));
        }

        let code = self.generate_unused_code().await?;
        let now = Timestamp::now();
        let link = ShortLink {
            code: code.clone(),
            normalized_url: normalized.clone(),
            created_at: now,
        };
        let owner = Ownership {
            user_id: user.clone(),
            code: code.clone(),
            created_at: now,
        };

        match self.repo.insert_with_owner(&link, &owner).await {
            Ok(()) => {
                self.fill_cache(&code, &normalized).await;
                info!(code = %code, url = %normalized, "created new short link");
                Ok(self.outcome(&link, false))
            }
            Err(StorageError::Conflict(_)) => {
                // A concurrent request created the link between our
                // lookup and our insert. The constraint is the arbiter;
                // re-read the winner and treat this as an existing link.
                debug!(url = %normalized, "lost creation race, re-reading winner");
                let winner = self
                    .repo
                    .get_by_normalized_url(&normalized)
                    .await?
                    .ok_or_else(|| StorageError::Conflict(normalized.clone()))?;
                self.ensure_ownership(user, &winner.code).await?;
                self.fill_cache(&winner.code, &normalized).await;
                Ok(self.outcome(&winner, true))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve(&self, raw_code: &str) -> Result<Option<String>, ServiceError> {
        let Ok(code) = ShortCode::parse(raw_code) else {
            debug!(code = raw_code, "invalid short code format");
            return Ok(None);
        };

        if let Some(url) = self.cached_url(&code).await {
            return Ok(Some(url));
        }

        match self.repo.get(&code).await? {
            Some(link) => {
                self.fill_cache(&code, &link.normalized_url).await;
                Ok(Some(link.normalized_url))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, user: &UserId) -> Result<Vec<OwnedLink>, ServiceError> {
        Ok(self.repo.list_by_user(user).await?)
    }

    async fn remove(&self, user: &UserId, raw_code: &str) -> Result<bool, ServiceError> {
        let Ok(code) = ShortCode::parse(raw_code) else {
            return Ok(false);
        };
        Ok(self.repo.delete_ownership(user, &code).await?)
    }

    async fn health(&self) -> HealthReport {
        let probe = ShortCode::new_unchecked("0000000");
        let storage_ok = match self.repo.exists(&probe).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "storage health check failed");
                false
            }
        };
        let cache_ok = match self.cache.get_url(&probe).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "cache health check failed");
                false
            }
        };
        HealthReport {
            storage_ok,
            cache_ok,
        }
    }
}
