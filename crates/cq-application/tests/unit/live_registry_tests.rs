//! Tests for the per-game live registry

use crate::test_utils::{World, entry_config};
use async_trait::async_trait;
use cq_application::{CacheManager, EntitySource, LiveRegistry};
use cq_domain::error::{Error, Result};
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::{EntityId, EntityRecord, Identified};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Minimal entity whose visibility check can be made to fail
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProbeRecord {
    #[serde(rename = "_id")]
    id: EntityId,
    game: EntityId,
    #[serde(default)]
    broken: bool,
}

impl EntityRecord for ProbeRecord {
    const COLLECTION: &'static str = "probes";

    fn id(&self) -> EntityId {
        self.id
    }

    fn game_id(&self) -> EntityId {
        self.game
    }
}

#[derive(Debug)]
struct Probe {
    id: EntityId,
    state: Mutex<Option<ProbeRecord>>,
}

impl Identified for Probe {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

#[async_trait]
impl LiveEntity for Probe {
    type Record = ProbeRecord;

    fn bind(id: EntityId) -> Self {
        Self {
            id,
            state: Mutex::new(None),
        }
    }

    fn hydrate(&self, record: ProbeRecord) {
        *self.state.lock().unwrap() = Some(record);
    }

    fn game_id(&self) -> Option<EntityId> {
        self.state.lock().unwrap().as_ref().map(|r| r.game)
    }

    async fn is_visible_to(&self, _user: EntityId) -> Result<bool> {
        let broken = self.state.lock().unwrap().as_ref().is_some_and(|r| r.broken);
        if broken {
            return Err(Error::internal(format!("probe {} cannot be checked", self.id)));
        }
        Ok(true)
    }
}

fn probe_registry(world: &World, game: EntityId) -> LiveRegistry<Probe> {
    let manager: CacheManager<Probe> = CacheManager::new(
        "probe",
        world.store.clone(),
        Arc::clone(&world.provider),
        entry_config(),
    )
    .unwrap();
    let source: Arc<dyn EntitySource<Probe>> = Arc::new(manager);
    LiveRegistry::new(game, source)
}

#[tokio::test]
async fn test_concurrent_gets_share_one_load() {
    let world = World::with_delay(Duration::from_millis(20));
    let game = EntityId::generate();
    let factory = world.add_factory(game, None);
    let registry = world.factories.registry_for(game);

    let results = join_all((0..10).map(|_| registry.get(factory))).await;

    let loaded: Vec<_> = results
        .into_iter()
        .map(|r| r.unwrap().expect("factory should load"))
        .collect();
    assert!(loaded.iter().all(|f| Arc::ptr_eq(f, &loaded[0])));
    assert_eq!(world.store.counts(), 1);
    assert_eq!(world.store.fetches(), 1);
    assert!(registry.contains(&factory));
}

#[tokio::test]
async fn test_entity_of_another_game_is_not_loaded() {
    let world = World::new();
    let (g1, g2) = (EntityId::generate(), EntityId::generate());
    let factory = world.add_factory(g1, None);
    let other = world.factories.registry_for(g2);

    assert!(other.get(factory).await.unwrap().is_none());
    assert!(!other.contains(&factory));
    assert!(other.is_empty());

    let own = world.factories.registry_for(g1);
    assert!(own.get(factory).await.unwrap().is_some());
    assert_eq!(own.ids(), vec![factory]);
}

#[tokio::test]
async fn test_load_all_loads_only_the_game() {
    let world = World::new();
    let (game, other) = (EntityId::generate(), EntityId::generate());
    let mut expected: Vec<EntityId> = (0..3).map(|_| world.add_factory(game, None)).collect();
    world.add_factory(other, None);
    expected.sort();

    let registry = world.factories.registry_for(game);
    assert_eq!(registry.load_all().await.unwrap(), 3);
    assert_eq!(registry.ids(), expected);
}

#[tokio::test]
async fn test_load_all_releases_what_was_loaded() {
    let world = World::new();
    let game = EntityId::generate();
    let factory = world.add_factory(game, None);
    let registry = world.factories.registry_for(game);

    let before = registry.get(factory).await.unwrap().unwrap();
    assert!(before.watch(EntityId::generate()));

    assert_eq!(registry.load_all().await.unwrap(), 1);

    let after = registry.get(factory).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&before, &after), "wrapper identity must survive reloads");
    assert!(after.watchers().is_empty());
}

#[tokio::test]
async fn test_unload_one_forgets_without_release() {
    let world = World::new();
    let game = EntityId::generate();
    let factory = world.add_factory(game, None);
    let registry = world.factories.registry_for(game);
    let loaded = registry.get(factory).await.unwrap().unwrap();
    let watcher = EntityId::generate();
    loaded.watch(watcher);

    assert!(registry.unload_one(factory).unwrap());
    assert!(!registry.unload_one(factory).unwrap());
    assert!(!registry.contains(&factory));
    assert_eq!(loaded.watchers(), vec![watcher]);
}

#[tokio::test]
async fn test_unload_all_reports_count() {
    let world = World::new();
    let game = EntityId::generate();
    for _ in 0..2 {
        world.add_factory(game, None);
    }
    let registry = world.factories.registry_for(game);
    registry.load_all().await.unwrap();

    assert_eq!(registry.unload_all(), 2);
    assert_eq!(registry.unload_all(), 0);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_unknown_id_yields_none() {
    let world = World::new();
    let registry = world.factories.registry_for(EntityId::generate());

    assert!(registry.get(EntityId::generate()).await.unwrap().is_none());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_malformed_id_is_rejected_before_the_store() {
    let world = World::new();
    let registry = world.factories.registry_for(EntityId::generate());

    let err = registry.get("not-an-id").await.unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(world.store.reads(), 0);
}

#[tokio::test]
async fn test_store_failure_leaves_entity_unloaded() {
    let world = World::new();
    let game = EntityId::generate();
    let factory = world.add_factory(game, None);
    let registry = world.factories.registry_for(game);

    world.store.set_failing(true);
    let err = registry.get(factory).await.unwrap_err();
    assert!(err.is_database(), "unexpected error: {err}");
    assert!(!registry.contains(&factory));

    world.store.set_failing(false);
    assert!(registry.get(factory).await.unwrap().is_some());
}

#[tokio::test]
async fn test_load_all_reports_failed_loads() {
    let world = World::new();
    let game = EntityId::generate();
    for _ in 0..3 {
        world.add_factory(game, None);
    }
    let registry = world.factories.registry_for(game);
    world.store.set_failing_counts(true);

    let err = registry.load_all().await.unwrap_err();

    assert!(err.is_database(), "unexpected error: {err}");
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_visible_to_filters_and_orders_by_id() {
    let world = World::new();
    let game = EntityId::generate();
    let user = EntityId::generate();
    let owned = world.add_factory(game, Some(user));
    let discovered = world.add_factory(game, None);
    world.add_factory(game, None);
    let registry = world.factories.registry_for(game);
    registry.load_all().await.unwrap();
    let seen = registry.get(discovered).await.unwrap().unwrap();
    assert!(seen.discover(user).unwrap());

    let visible = registry.visible_to(user).await.unwrap();

    let mut expected = vec![owned, discovered];
    expected.sort();
    let ids: Vec<EntityId> = visible.iter().map(|f| f.entity_id()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_visible_to_on_empty_registry() {
    let world = World::new();
    let registry = world.factories.registry_for(EntityId::generate());

    assert!(registry.visible_to(EntityId::generate()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_visible_to_reports_failing_check() {
    let world = World::new();
    let game = EntityId::generate();
    for broken in [false, true, false] {
        world
            .memory
            .insert_record(&ProbeRecord {
                id: EntityId::generate(),
                game,
                broken,
            })
            .unwrap();
    }
    let registry = probe_registry(&world, game);
    assert_eq!(registry.load_all().await.unwrap(), 3);

    let err = registry.visible_to(EntityId::generate()).await.unwrap_err();

    assert!(matches!(err, Error::Internal { .. }), "unexpected error: {err}");
}
