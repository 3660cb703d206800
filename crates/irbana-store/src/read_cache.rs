//! Short-lived cache for idempotent reads.
//!
//! Entries expire a few seconds after insertion. Concurrent loads of the same
//! key share one in-flight future, so a burst of identical reads issues a
//! single network call.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

use irbana_core::config::cache::CacheConfig;
use irbana_core::error::AppError;
use irbana_core::result::AppResult;

/// TTL cache of decoded response bodies.
#[derive(Debug, Clone)]
pub struct ReadCache {
    cache: Cache<String, Value>,
}

impl ReadCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_ttl(Duration::from_secs(config.read_ttl_seconds), config.max_capacity)
    }

    /// Create a cache with an explicit TTL.
    pub fn with_ttl(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    ///
    /// Errors are never cached; every waiter of a failed load receives a copy
    /// of the error.
    pub async fn get_or_load<F, Fut>(&self, key: String, load: F) -> AppResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Value>>,
    {
        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "Read cache hit");
            return Ok(hit);
        }
        self.cache
            .try_get_with(key, load())
            .await
            .map_err(|e: std::sync::Arc<AppError>| (*e).clone())
    }

    /// Drop a single entry.
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
