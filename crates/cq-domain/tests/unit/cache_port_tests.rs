//! Unit tests for cache port helpers

use cq_domain::constants::DEFAULT_CACHE_TTL_SECS;
use cq_domain::ports::providers::glob_matches;
use cq_domain::ports::{CacheEntryConfig, CacheStats};
use std::time::Duration;

#[test]
fn test_glob_prefix_pattern() {
    assert!(glob_matches("team:*", "team:userCount:x"));
    assert!(glob_matches("team:*", "team:"));
    assert!(!glob_matches("team:*", "teams:getMany:x"));
    assert!(!glob_matches("team:*", "factory:team:x"));
}

#[test]
fn test_glob_inner_and_exact_patterns() {
    assert!(glob_matches("team:*:game=*", "team:getMany:game=abc"));
    assert!(!glob_matches("team:*:game=*", "team:getMany:owner=abc"));
    assert!(glob_matches("exact", "exact"));
    assert!(!glob_matches("exact", "exactly"));
    assert!(glob_matches("*", "anything"));
}

#[test]
fn test_entry_config_ttl() {
    assert_eq!(
        CacheEntryConfig::default().effective_ttl(),
        Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
    );
    assert_eq!(
        CacheEntryConfig::new().with_ttl_secs(7).effective_ttl(),
        Duration::from_secs(7)
    );
    let unset = CacheEntryConfig { ttl: None };
    assert_eq!(
        unset.effective_ttl(),
        Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
    );
}

#[test]
fn test_hit_rate() {
    let stats = CacheStats {
        hits: 3,
        misses: 1,
        ..CacheStats::default()
    };
    assert!((stats.calculate_hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!(CacheStats::new().calculate_hit_rate().abs() < f64::EPSILON);
}
