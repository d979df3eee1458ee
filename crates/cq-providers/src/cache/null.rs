//! Null cache provider
//!
//! A cache provider that stores nothing. Selected when caching is disabled;
//! every read misses and every query reaches the authoritative store.

use async_trait::async_trait;
use cq_domain::error::Result;
use cq_domain::ports::{CacheEntryConfig, CacheProvider, CacheStats};
use std::sync::Arc;

/// Null cache provider that doesn't store anything
///
/// # Example
///
/// ```rust
/// use cq_providers::cache::NullCacheProvider;
///
/// let provider = NullCacheProvider::new();
/// // All operations succeed but nothing is cached
/// ```
#[derive(Debug, Clone, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a new null cache provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<u64> {
        Ok(0)
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::new())
    }

    async fn size(&self) -> Result<usize> {
        Ok(0)
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

use cq_application::ports::registry::{CACHE_PROVIDERS, CacheProviderEntry};

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static NULL_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "null",
    description: "Stores nothing (caching disabled)",
    factory: |_| Ok(Arc::new(NullCacheProvider::new())),
};
