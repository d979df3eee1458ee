//! Read-through cache
//!
//! One instance per entity namespace. Reads go to the fast store first and
//! fall back to the authoritative query on a miss, a malformed value, a
//! fast-store error, or a fast store that reports itself not ready. The
//! authoritative result is written back on a background task with the
//! namespace TTL.
//!
//! A stored JSON `null` is a confirmed-empty result for optional values, so
//! `Option<T>` queries cache their negative answers too.
//!
//! Every flush starts a new generation. A query that began before a flush
//! does not write its result back after it.

use crate::cache::key::CacheKey;
use crate::coordination::FanInLatch;
use cq_domain::error::{Error, Result};
use cq_domain::ports::{CacheEntryConfig, CacheProvider};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    bypassed: AtomicU64,
    fast_errors: AtomicU64,
    authoritative_reads: AtomicU64,
    write_failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of one namespace's read-through activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadThroughStats {
    /// Namespace the numbers belong to
    pub namespace: String,
    /// Well-formed fast-store hits
    pub hits: u64,
    /// Absent, empty or malformed fast-store values
    pub misses: u64,
    /// Reads that skipped a fast store reporting not ready
    pub bypassed: u64,
    /// Fast-store read errors
    pub fast_errors: u64,
    /// Queries run against the authoritative store
    pub authoritative_reads: u64,
    /// Write-backs the fast store rejected
    pub write_failures: u64,
    /// Write-backs still running
    pub pending_writes: usize,
}

/// Fast-store-first query executor for one namespace
pub struct ReadThroughCache {
    namespace: String,
    provider: Arc<dyn CacheProvider>,
    entry_config: CacheEntryConfig,
    pending_writes: FanInLatch,
    generation: AtomicU64,
    counters: Arc<Counters>,
}

impl ReadThroughCache {
    /// Create a cache for `namespace`; fails on an invalid namespace
    pub fn new(
        namespace: impl Into<String>,
        provider: Arc<dyn CacheProvider>,
        entry_config: CacheEntryConfig,
    ) -> Result<Self> {
        let namespace = namespace.into();
        CacheKey::validate_namespace(&namespace)?;
        Ok(Self {
            namespace,
            provider,
            entry_config,
            pending_writes: FanInLatch::new(),
            generation: AtomicU64::new(0),
            counters: Arc::new(Counters::default()),
        })
    }

    /// Namespace prefix of every key written by this cache
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fast store behind this cache
    pub fn provider(&self) -> &Arc<dyn CacheProvider> {
        &self.provider
    }

    /// Run `operation` through the cache
    ///
    /// `fingerprint` must spell out every argument of the operation; the
    /// composed key is `{namespace}:{operation}:{fingerprint}`. Errors from
    /// `query` are wrapped as database errors and returned; fast-store
    /// trouble never is.
    pub async fn fetch<T, F, Fut>(&self, operation: &str, fingerprint: &str, query: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = CacheKey::compose(&self.namespace, operation, fingerprint);
        if let Some(value) = self.read_fast::<T>(&key).await {
            return Ok(value);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        Counters::bump(&self.counters.authoritative_reads);
        let value = query().await.map_err(|e| {
            Error::database_with_source(
                format!("{}.{operation} query failed", self.namespace),
                e,
            )
        })?;
        self.write_back(key, &value, generation);
        Ok(value)
    }

    async fn read_fast<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.provider.is_ready() {
            Counters::bump(&self.counters.bypassed);
            debug!(key, provider = self.provider.provider_name(), "fast store not ready");
            return None;
        }
        match self.provider.get_json(key).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => match serde_json::from_str(&raw) {
                Ok(value) => {
                    Counters::bump(&self.counters.hits);
                    debug!(key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    Counters::bump(&self.counters.misses);
                    warn!(key, error = %e, "malformed cached value, treating as miss");
                    None
                }
            },
            Ok(_) => {
                Counters::bump(&self.counters.misses);
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                Counters::bump(&self.counters.fast_errors);
                warn!(key, error = %e, "fast store read failed, using authoritative store");
                None
            }
        }
    }

    fn write_back<T: Serialize>(&self, key: String, value: &T, generation: u64) {
        if !self.provider.is_ready() {
            return;
        }
        // Registered before the generation check so a concurrent flush either
        // waits for this write or sees it skipped.
        let ticket = self.pending_writes.ticket();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(key, "namespace flushed during query, skipping write-back");
            return;
        }
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "cannot serialize value for write-back");
                return;
            }
        };
        let provider = Arc::clone(&self.provider);
        let config = self.entry_config.clone();
        let counters = Arc::clone(&self.counters);
        tokio::spawn(async move {
            let _ticket = ticket;
            if let Err(e) = provider.set_json(&key, &json, config).await {
                Counters::bump(&counters.write_failures);
                warn!(key, error = %e, "cache write-back failed");
            }
        });
    }

    /// Wait for every write-back started so far
    pub async fn settle(&self) {
        self.pending_writes.wait().await;
    }

    /// Delete every fast-store key of the namespace, returning how many
    ///
    /// Queries still running keep their results out of the fast store, and
    /// write-backs already started land before the delete, so no stale value
    /// survives the flush. Fast-store failures are logged and reported as zero.
    pub async fn flush_namespace(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.settle().await;
        let pattern = CacheKey::namespace_pattern(&self.namespace);
        if !self.provider.is_ready() {
            warn!(pattern, "fast store not ready, namespace not flushed");
            return 0;
        }
        match self.provider.delete_pattern(&pattern).await {
            Ok(removed) => {
                info!(namespace = %self.namespace, removed, "cache namespace flushed");
                removed
            }
            Err(e) => {
                warn!(pattern, error = %e, "cache namespace flush failed");
                0
            }
        }
    }

    /// Current counters
    pub fn stats(&self) -> ReadThroughStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        ReadThroughStats {
            namespace: self.namespace.clone(),
            hits: load(&self.counters.hits),
            misses: load(&self.counters.misses),
            bypassed: load(&self.counters.bypassed),
            fast_errors: load(&self.counters.fast_errors),
            authoritative_reads: load(&self.counters.authoritative_reads),
            write_failures: load(&self.counters.write_failures),
            pending_writes: self.pending_writes.pending(),
        }
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("namespace", &self.namespace)
            .field("provider", &self.provider.provider_name())
            .field("ttl", &self.entry_config.effective_ttl())
            .finish()
    }
}
