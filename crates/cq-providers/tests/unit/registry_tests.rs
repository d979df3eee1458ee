//! Tests for cache provider registration

use cq_application::ports::registry::{
    CacheProviderConfig, list_cache_providers, resolve_cache_provider,
};
use cq_providers::cache::NullCacheProvider;

#[test]
fn test_builtin_providers_are_registered() {
    let names: Vec<&str> = list_cache_providers()
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    assert!(names.contains(&"null"));
    #[cfg(feature = "cache-moka")]
    assert!(names.contains(&"moka"));
    #[cfg(feature = "cache-redis")]
    assert!(names.contains(&"redis"));
}

#[test]
fn test_resolve_by_name() {
    let provider = resolve_cache_provider(&CacheProviderConfig::new("null")).unwrap();
    assert_eq!(provider.provider_name(), "null");
    assert_eq!(format!("{:?}", NullCacheProvider::new()), "NullCacheProvider");
}

#[test]
fn test_unknown_provider_lists_alternatives() {
    let err = resolve_cache_provider(&CacheProviderConfig::new("memcached")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("memcached"));
    assert!(message.contains("null"));
}

#[cfg(feature = "cache-redis")]
#[test]
fn test_redis_provider_starts_ready_without_connecting() {
    let config = CacheProviderConfig::new("redis")
        .with_uri("redis://127.0.0.1:1")
        .with_retry_after_secs(30);
    let provider = resolve_cache_provider(&config).unwrap();
    assert!(provider.is_ready());
    assert_eq!(provider.provider_name(), "redis");
}
