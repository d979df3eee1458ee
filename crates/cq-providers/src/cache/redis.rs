//! Redis distributed cache provider
//!
//! Distributed cache implementation using Redis as the backend.
//! Suitable for multi-instance deployments.
//!
//! ## Features
//!
//! - `SET EX` with the per-entry TTL
//! - Pattern deletion through `SCAN MATCH` + `DEL`
//! - Auto-reconnecting connection via `ConnectionManager`
//! - Readiness tracking: after a connection failure the provider reports not
//!   ready until the retry back-off has elapsed, so callers skip it instead of
//!   waiting on a dead server
//!
//! ## Example
//!
//! ```ignore
//! use cq_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379", Duration::from_secs(5))?;
//! ```

use crate::constants::{REDIS_DEFAULT_RETRY_AFTER_SECS, REDIS_DEFAULT_URI, REDIS_SCAN_BATCH};
use async_trait::async_trait;
use cq_domain::error::{Error, Result};
use cq_domain::ports::{CacheEntryConfig, CacheProvider, CacheStats};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, RedisResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Redis cache provider
pub struct RedisCacheProvider {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    ready: AtomicBool,
    retry_at: Mutex<Option<Instant>>,
    retry_after: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RedisCacheProvider {
    /// Create a provider for `uri`; no connection is made until first use
    pub fn new(uri: &str, retry_after: Duration) -> Result<Self> {
        let client = Client::open(uri)
            .map_err(|e| Error::cache_with_source("Failed to create Redis client", e))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            ready: AtomicBool::new(true),
            retry_at: Mutex::new(None),
            retry_after,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| self.client.get_connection_manager())
            .await
            .map_err(|e| {
                self.mark_unavailable(&e);
                Error::cache_with_source("Failed to connect to Redis", e)
            })?;
        Ok(manager.clone())
    }

    /// Record the outcome of one command
    fn track<T>(&self, result: RedisResult<T>, command: &str) -> Result<T> {
        match result {
            Ok(value) => {
                self.mark_available();
                Ok(value)
            }
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
                    self.mark_unavailable(&e);
                }
                Err(Error::cache_with_source(format!("Redis {command} failed"), e))
            }
        }
    }

    fn mark_unavailable(&self, error: &RedisError) {
        *self.retry_at.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Instant::now() + self.retry_after);
        if self.ready.swap(false, Ordering::AcqRel) {
            warn!(
                error = %error,
                retry_after_secs = self.retry_after.as_secs(),
                "Redis unreachable, skipping it until retry"
            );
        }
    }

    fn mark_available(&self) {
        if !self.ready.swap(true, Ordering::AcqRel) {
            *self.retry_at.lock().unwrap_or_else(PoisonError::into_inner) = None;
            info!("Redis reachable again");
        }
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = self.track(conn.get(key).await, "GET")?;
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.connection().await?;
        let ttl_seconds = config.effective_ttl().as_secs().max(1);
        let result: RedisResult<()> = conn.set_ex(key, value, ttl_seconds).await;
        self.track(result, "SET")
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let deleted: u64 = self.track(conn.del(key).await, "DEL")?;
        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        let mut removed = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = self.track(
                redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(REDIS_SCAN_BATCH)
                    .query_async(&mut conn)
                    .await,
                "SCAN",
            )?;
            if !keys.is_empty() {
                let deleted: u64 = self.track(conn.del(&keys).await, "DEL")?;
                removed += deleted;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        self.track(conn.exists(key).await, "EXISTS")
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        self.track(redis::cmd("FLUSHDB").query_async(&mut conn).await, "FLUSHDB")
    }

    async fn stats(&self) -> Result<CacheStats> {
        let entries = self.size().await?;
        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: entries as u64,
            hit_rate: 0.0,
        };
        stats.hit_rate = stats.calculate_hit_rate();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        let mut conn = self.connection().await?;
        self.track(redis::cmd("DBSIZE").query_async(&mut conn).await, "DBSIZE")
    }

    fn is_ready(&self) -> bool {
        if self.ready.load(Ordering::Acquire) {
            return true;
        }
        self.retry_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none_or(|at| Instant::now() >= at)
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("ready", &self.ready.load(Ordering::Relaxed))
            .field("retry_after", &self.retry_after)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use cq_application::ports::registry::{CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry};

/// Factory function for creating Redis cache provider instances.
fn redis_cache_factory(config: &CacheProviderConfig) -> Result<Arc<dyn CacheProvider>> {
    let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URI);
    let retry_after = Duration::from_secs(
        config
            .retry_after_secs
            .unwrap_or(REDIS_DEFAULT_RETRY_AFTER_SECS),
    );
    Ok(Arc::new(RedisCacheProvider::new(uri, retry_after)?))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "redis",
    description: "Redis distributed cache",
    factory: redis_cache_factory,
};
