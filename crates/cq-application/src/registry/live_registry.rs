//! Live registry of one active game
//!
//! Holds the wrappers currently loaded for a game. Lookups that miss the
//! loaded set go through a per-registry single-flight loader, so concurrent
//! requests for the same unloaded entity trigger one load.
//!
//! Per entity: unloaded, loading (in flight), loaded, and back to unloaded
//! on `unload_all` or `unload_one`.

use crate::coordination::{FanInLatch, SingleFlight};
use crate::registry::EntitySource;
use cq_domain::error::{Error, Result};
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::{EntityId, EntityRecord, EntityRef, resolve_id};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;
use tracing::{debug, info};

struct RegistryInner<E: LiveEntity> {
    game: EntityId,
    source: Arc<dyn EntitySource<E>>,
    loaded: RwLock<HashMap<EntityId, Arc<E>>>,
    loader: SingleFlight<EntityId, Option<Arc<E>>>,
}

/// Loaded entities of one game
///
/// Cloning yields another handle to the same registry.
pub struct LiveRegistry<E: LiveEntity> {
    inner: Arc<RegistryInner<E>>,
}

impl<E: LiveEntity> Clone for LiveRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: LiveEntity> LiveRegistry<E> {
    /// Create an empty registry for `game`
    pub fn new(game: EntityId, source: Arc<dyn EntitySource<E>>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                game,
                source,
                loaded: RwLock::new(HashMap::new()),
                loader: SingleFlight::new(),
            }),
        }
    }

    /// Game this registry belongs to
    pub fn game(&self) -> EntityId {
        self.inner.game
    }

    fn read_loaded(&self) -> RwLockReadGuard<'_, HashMap<EntityId, Arc<E>>> {
        self.inner
            .loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_loaded(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, Arc<E>>> {
        self.inner
            .loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded_entry(&self, id: &EntityId) -> Option<Arc<E>> {
        self.read_loaded().get(id).cloned()
    }

    /// Loaded wrapper for `entity`, loading it if needed
    ///
    /// Returns `None` when the id is unknown or the record belongs to another
    /// game; such entities never join the loaded set.
    pub async fn get<'a>(&self, entity: impl Into<EntityRef<'a>>) -> Result<Option<Arc<E>>> {
        let id = resolve_id(entity)?;
        if let Some(loaded) = self.loaded_entry(&id) {
            return Ok(Some(loaded));
        }
        let registry = self.clone();
        self.inner
            .loader
            .load(id, move || async move { registry.load_entity(id).await })
            .await
    }

    async fn load_entity(&self, id: EntityId) -> Result<Option<Arc<E>>> {
        if let Some(loaded) = self.loaded_entry(&id) {
            return Ok(Some(loaded));
        }
        if !self.inner.source.is_valid_id(id).await? {
            debug!(game = %self.inner.game, %id, "unknown id");
            return Ok(None);
        }
        let Some(record) = self.inner.source.load_record(id).await? else {
            debug!(game = %self.inner.game, %id, "record disappeared before load");
            return Ok(None);
        };
        if record.game_id() != self.inner.game {
            debug!(
                game = %self.inner.game,
                owner = %record.game_id(),
                %id,
                "entity belongs to another game"
            );
            return Ok(None);
        }
        let entity = self.inner.source.wrap(record);
        self.write_loaded().insert(id, Arc::clone(&entity));
        debug!(game = %self.inner.game, %id, "entity loaded");
        Ok(Some(entity))
    }

    /// Reload every entity of the game, returning how many are loaded
    ///
    /// Everything currently loaded is unloaded first. All loads run
    /// concurrently; the first error is returned once every load finished.
    /// Entities that did load stay loaded.
    pub async fn load_all(&self) -> Result<usize> {
        let ids = self.inner.source.list_ids_for_game(self.inner.game).await?;
        self.unload_all();

        let latch = FanInLatch::new();
        let first_error: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));
        for id in ids {
            let ticket = latch.ticket();
            let registry = self.clone();
            let first_error = Arc::clone(&first_error);
            tokio::spawn(async move {
                let _ticket = ticket;
                if let Err(e) = registry.get(id).await {
                    let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                }
            });
        }
        latch.wait().await;

        let error = first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(e) = error {
            return Err(e);
        }
        let count = self.len();
        info!(game = %self.inner.game, count, "game entities loaded");
        Ok(count)
    }

    /// Release and forget every loaded entity, returning how many there were
    pub fn unload_all(&self) -> usize {
        let drained: Vec<Arc<E>> = {
            let mut loaded = self.write_loaded();
            loaded.drain().map(|(_, entity)| entity).collect()
        };
        for entity in &drained {
            entity.release();
        }
        if !drained.is_empty() {
            info!(game = %self.inner.game, count = drained.len(), "game entities unloaded");
        }
        drained.len()
    }

    /// Forget one entity without releasing it; `true` if it was loaded
    pub fn unload_one<'a>(&self, entity: impl Into<EntityRef<'a>>) -> Result<bool> {
        let id = resolve_id(entity)?;
        Ok(self.write_loaded().remove(&id).is_some())
    }

    /// Loaded entities visible to `user`, ordered by id
    ///
    /// Every check runs concurrently. The first failing check is returned
    /// without waiting for the rest.
    pub async fn visible_to<'a>(&self, user: impl Into<EntityRef<'a>>) -> Result<Vec<Arc<E>>> {
        let user = resolve_id(user)?;
        let entities = self.entities();
        let latch = FanInLatch::new();
        let visible: Arc<Mutex<Vec<Arc<E>>>> = Arc::new(Mutex::new(Vec::new()));
        let (errors_tx, mut errors) = mpsc::channel::<Error>(1);

        for entity in entities {
            let ticket = latch.ticket();
            let visible = Arc::clone(&visible);
            let errors_tx = errors_tx.clone();
            tokio::spawn(async move {
                let _ticket = ticket;
                let outcome = entity.is_visible_to(user).await;
                match outcome {
                    Ok(true) => visible
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(entity),
                    Ok(false) => {}
                    Err(e) => {
                        let _ = errors_tx.try_send(e);
                    }
                }
            });
        }
        drop(errors_tx);

        tokio::select! {
            biased;
            Some(e) = errors.recv() => return Err(e),
            () = latch.wait() => {}
        }
        if let Ok(e) = errors.try_recv() {
            return Err(e);
        }

        let mut visible = std::mem::take(
            &mut *visible.lock().unwrap_or_else(PoisonError::into_inner),
        );
        visible.sort_by_key(|entity| entity.entity_id());
        Ok(visible)
    }

    /// Whether `id` is loaded
    pub fn contains(&self, id: &EntityId) -> bool {
        self.read_loaded().contains_key(id)
    }

    /// Number of loaded entities
    pub fn len(&self) -> usize {
        self.read_loaded().len()
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.read_loaded().is_empty()
    }

    /// Snapshot of the loaded entities, ordered by id
    pub fn entities(&self) -> Vec<Arc<E>> {
        let mut entities: Vec<Arc<E>> = self.read_loaded().values().cloned().collect();
        entities.sort_by_key(|entity| entity.entity_id());
        entities
    }

    /// Snapshot of the loaded ids, sorted
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.read_loaded().keys().copied().collect();
        ids.sort();
        ids
    }
}

impl<E: LiveEntity> std::fmt::Debug for LiveRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveRegistry")
            .field("game", &self.inner.game)
            .field("loaded", &self.len())
            .field("loader", &self.inner.loader)
            .finish()
    }
}
