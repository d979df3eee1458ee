//! Cache Provider Registry
//!
//! Fast-store providers register an entry in [`CACHE_PROVIDERS`] at link
//! time; configuration selects one by name at startup.

use std::sync::Arc;

use cq_domain::error::{Error, Result};
use cq_domain::ports::CacheProvider;

/// Configuration for cache provider creation
///
/// Carries every option a provider might need. Providers use what they need
/// and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct CacheProviderConfig {
    /// Provider name (e.g., "moka", "redis", "null")
    pub provider: String,
    /// Connection URI (for distributed caches)
    pub uri: Option<String>,
    /// Maximum number of entries (in-memory caches)
    pub max_entries: Option<u64>,
    /// Default TTL in seconds
    pub ttl_secs: Option<u64>,
    /// Seconds to wait before retrying an unreachable store
    pub retry_after_secs: Option<u64>,
}

impl CacheProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the entry limit
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Set the TTL in seconds
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    /// Set the reconnect back-off in seconds
    pub fn with_retry_after_secs(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }
}

/// Registry entry for cache providers
pub struct CacheProviderEntry {
    /// Unique provider name (e.g., "moka", "redis", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&CacheProviderConfig) -> Result<Arc<dyn CacheProvider>>,
}

#[linkme::distributed_slice]
pub static CACHE_PROVIDERS: [CacheProviderEntry] = [..];

/// Resolve cache provider by name from registry
///
/// # Errors
/// `Error::Configuration` when no provider has the configured name, or
/// whatever the provider's factory reports.
pub fn resolve_cache_provider(config: &CacheProviderConfig) -> Result<Arc<dyn CacheProvider>> {
    if let Some(entry) = CACHE_PROVIDERS.iter().find(|e| e.name == config.provider) {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = CACHE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(Error::configuration(format!(
        "Unknown cache provider '{}'. Available providers: {available:?}",
        config.provider
    )))
}

/// List all registered cache providers as (name, description), sorted by name
pub fn list_cache_providers() -> Vec<(&'static str, &'static str)> {
    let mut providers: Vec<(&'static str, &'static str)> = CACHE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect();
    providers.sort_unstable();
    providers
}
