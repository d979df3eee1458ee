//! Cache configuration types

use crate::constants::{
    CACHE_DEFAULT_MAX_ENTRIES, CACHE_DEFAULT_PROVIDER, CACHE_DEFAULT_RETRY_AFTER_SECS,
    CACHE_DISABLED_PROVIDER,
};
use cq_application::ports::registry::CacheProviderConfig;
use cq_domain::constants::DEFAULT_CACHE_TTL_SECS;
use cq_domain::ports::CacheEntryConfig;
use serde::{Deserialize, Serialize};

/// Fast-store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache enabled; when off the null provider is used
    pub enabled: bool,

    /// Registered provider name (`moka`, `redis`, `null`)
    pub provider: String,

    /// TTL of every cached query result, in seconds
    pub default_ttl_secs: u64,

    /// Entry limit of in-process providers
    pub max_entries: u64,

    /// Connection URL for the Redis provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,

    /// Seconds an unreachable Redis is skipped before retrying
    pub retry_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: CACHE_DEFAULT_PROVIDER.to_string(),
            default_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_entries: CACHE_DEFAULT_MAX_ENTRIES,
            redis_url: None,
            retry_after_secs: CACHE_DEFAULT_RETRY_AFTER_SECS,
        }
    }
}

impl CacheConfig {
    /// Name of the provider to resolve, honoring `enabled`
    pub fn effective_provider(&self) -> &str {
        if self.enabled {
            &self.provider
        } else {
            CACHE_DISABLED_PROVIDER
        }
    }

    /// Registry lookup configuration
    pub fn provider_config(&self) -> CacheProviderConfig {
        let mut config = CacheProviderConfig::new(self.effective_provider())
            .with_max_entries(self.max_entries)
            .with_ttl_secs(self.default_ttl_secs)
            .with_retry_after_secs(self.retry_after_secs);
        if let Some(url) = &self.redis_url {
            config = config.with_uri(url.clone());
        }
        config
    }

    /// Per-entry settings for cached query results
    pub fn entry_config(&self) -> CacheEntryConfig {
        CacheEntryConfig::new().with_ttl_secs(self.default_ttl_secs)
    }
}
