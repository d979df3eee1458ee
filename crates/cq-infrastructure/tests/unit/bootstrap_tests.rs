//! Application Bootstrap Tests

use cq_domain::error::Error;
use cq_domain::ports::AuthoritativeStore;
use cq_domain::value_objects::{EntityId, FactoryFilter, FactoryRecord, GeoPoint};
use cq_infrastructure::config::{AppConfig, CacheConfig, ConfigBuilder, RegistryConfig};
use cq_infrastructure::{AppContext, init_app};
use cq_providers::InMemoryDocumentStore;
use std::sync::Arc;

fn factory(game: EntityId, name: &str) -> FactoryRecord {
    FactoryRecord {
        id: EntityId::generate(),
        game,
        team: None,
        owner: None,
        name: name.to_string(),
        position: GeoPoint {
            lat: 48.85,
            lng: 2.35,
        },
        level: 1,
        resources: 10,
        discovered_by: Vec::new(),
    }
}

fn seeded_store(game: EntityId, count: usize) -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    for i in 0..count {
        store
            .insert_record(&factory(game, &format!("mill-{i}")))
            .unwrap();
    }
    store
}

fn context_with(config: AppConfig, store: InMemoryDocumentStore) -> AppContext {
    let store: Arc<dyn AuthoritativeStore> = Arc::new(store);
    init_app(config, store).unwrap()
}

#[tokio::test]
async fn test_default_context_uses_moka() {
    let game = EntityId::generate();
    let context = context_with(AppConfig::default(), seeded_store(game, 2));

    assert_eq!(context.cache_provider().provider_name(), "moka");
    assert!(context.active_games().is_empty());

    let report = context.check().await.unwrap();
    assert_eq!(report.cache_provider, "moka");
    assert!(report.cache_ready);
    assert_eq!(report.factories, 2);
}

#[tokio::test]
async fn test_disabled_cache_resolves_null_provider() {
    let config = ConfigBuilder::new()
        .with_cache(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        })
        .build()
        .unwrap();
    let context = context_with(config, InMemoryDocumentStore::new());

    assert_eq!(context.cache_provider().provider_name(), "null");
    let report = context.check().await.unwrap();
    assert_eq!(report.factories, 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = AppConfig {
        cache: CacheConfig {
            provider: "memcached".to_string(),
            ..CacheConfig::default()
        },
        ..AppConfig::default()
    };
    let store: Arc<dyn AuthoritativeStore> = Arc::new(InMemoryDocumentStore::new());

    let result = AppContext::new(config, store);
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[tokio::test]
async fn test_activate_preloads_and_reuses_session() {
    let game = EntityId::generate();
    let context = context_with(AppConfig::default(), seeded_store(game, 3));

    let first = context.activate_game(game).await.unwrap();
    let second = context.activate_game(&game.to_hex()).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.factories().len(), 3);
    assert_eq!(context.active_games(), vec![game]);
    assert!(context.session(&game).is_some());

    assert!(context.deactivate_game(game).unwrap());
    assert!(!context.deactivate_game(game).unwrap());
    assert!(context.session(&game).is_none());
}

#[tokio::test]
async fn test_lazy_sessions_start_empty() {
    let game = EntityId::generate();
    let config = ConfigBuilder::new()
        .with_registry(RegistryConfig {
            preload_on_activate: false,
        })
        .build()
        .unwrap();
    let context = context_with(config, seeded_store(game, 2));

    let session = context.activate_game(game).await.unwrap();
    assert!(session.factories().is_empty());
}

#[tokio::test]
async fn test_flush_all_caches_forgets_counts() {
    let game = EntityId::generate();
    let store = seeded_store(game, 1);
    let context = context_with(AppConfig::default(), store.clone());
    let filter = FactoryFilter::in_game(game);

    assert_eq!(context.factories().get_count(&filter).await.unwrap(), 1);
    context.factories().cache_manager().cache().settle().await;

    store.insert_record(&factory(game, "late")).unwrap();
    assert_eq!(context.factories().get_count(&filter).await.unwrap(), 1);

    assert!(context.flush_all_caches().await >= 1);
    assert_eq!(context.factories().get_count(&filter).await.unwrap(), 2);
}

#[tokio::test]
async fn test_shutdown_closes_sessions() {
    let context = context_with(AppConfig::default(), InMemoryDocumentStore::new());
    context.activate_game(EntityId::generate()).await.unwrap();
    context.activate_game(EntityId::generate()).await.unwrap();

    assert_eq!(context.shutdown(), 2);
    assert!(context.active_games().is_empty());
}

#[tokio::test]
async fn test_malformed_game_id() {
    let context = context_with(AppConfig::default(), InMemoryDocumentStore::new());

    let result = context.activate_game("not-an-id").await;
    assert!(result.as_ref().is_err_and(Error::is_invalid_argument));
}
