//! Tests for the Moka cache provider

use cq_domain::ports::{CacheEntryConfig, CacheProvider};
use cq_providers::cache::MokaCacheProvider;
use std::time::Duration;

#[tokio::test]
async fn test_set_and_get_round_trip() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json("team:getCount:game=*", "3", CacheEntryConfig::default())
        .await
        .unwrap();

    assert_eq!(
        cache.get_json("team:getCount:game=*").await.unwrap().as_deref(),
        Some("3")
    );
    assert!(cache.exists("team:getCount:game=*").await.unwrap());
    assert_eq!(cache.get_json("team:other").await.unwrap(), None);
}

#[tokio::test]
async fn test_entry_expires_after_its_own_ttl() {
    let cache = MokaCacheProvider::new();
    let short = CacheEntryConfig::new().with_ttl(Duration::from_millis(200));
    let long = CacheEntryConfig::new().with_ttl_secs(60);
    cache.set_json("a:short", "1", short).await.unwrap();
    cache.set_json("a:long", "2", long).await.unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(cache.get_json("a:short").await.unwrap(), None);
    assert_eq!(cache.get_json("a:long").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn test_delete_pattern_only_touches_namespace() {
    let cache = MokaCacheProvider::new();
    let config = CacheEntryConfig::default();
    for key in ["team:userCount:1", "team:userCount:2", "team:isValidId:3"] {
        cache.set_json(key, "1", config.clone()).await.unwrap();
    }
    cache.set_json("userGame:getMany:x", "[]", config).await.unwrap();

    let removed = cache.delete_pattern("team:*").await.unwrap();

    assert_eq!(removed, 3);
    assert_eq!(cache.get_json("team:userCount:1").await.unwrap(), None);
    assert!(cache.exists("userGame:getMany:x").await.unwrap());
}

#[tokio::test]
async fn test_delete_reports_existence() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json("factory:isValidId:x", "true", CacheEntryConfig::default())
        .await
        .unwrap();

    assert!(cache.delete("factory:isValidId:x").await.unwrap());
    assert!(!cache.delete("factory:isValidId:x").await.unwrap());
}

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json("k:1", "1", CacheEntryConfig::default())
        .await
        .unwrap();
    let _ = cache.get_json("k:1").await.unwrap();
    let _ = cache.get_json("k:2").await.unwrap();

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_clear_empties_cache() {
    let cache = MokaCacheProvider::with_capacity(10);
    cache
        .set_json("k:1", "1", CacheEntryConfig::default())
        .await
        .unwrap();
    cache.clear().await.unwrap();

    assert_eq!(cache.size().await.unwrap(), 0);
    assert!(cache.is_ready());
    assert_eq!(cache.max_entries(), 10);
}
