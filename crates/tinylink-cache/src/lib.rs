//! Cache backends for tinylink.
//!
//! Implementations of the bidirectional [`LinkCache`] contract: an
//! in-process Moka cache for single-node deployments and a Redis cache
//! for shared deployments. Both are advisory accelerators; the
//! allocation engine treats every failure as a miss.
//!
//! [`LinkCache`]: tinylink_core::LinkCache

pub mod moka;
pub mod redis;

use std::time::Duration;

/// Default expiration window for cache entries in both directions.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

pub use crate::moka::MokaLinkCache;
pub use crate::redis::RedisLinkCache;
