//! Per-type cache manager
//!
//! Ties together the three layers one entity type needs: the read-through
//! cache for query results, the identity cache for live wrappers and the
//! single-flight loader that keeps concurrent `get_by_id` calls for one id
//! down to a single store round-trip.

use crate::cache::identity::IdentityCache;
use crate::cache::read_through::{ReadThroughCache, ReadThroughStats};
use crate::coordination::SingleFlight;
use crate::registry::EntitySource;
use async_trait::async_trait;
use cq_domain::constants::{ID_FIELD, fields};
use cq_domain::error::{Error, Result};
use cq_domain::ports::{AuthoritativeStore, CacheEntryConfig, CacheProvider, LiveEntity};
use cq_domain::value_objects::{
    Document, EntityId, EntityRecord, EntityRef, Filter, QueryOptions, resolve_id,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Cached operation names shared by every manager
pub mod operations {
    /// Id existence check
    pub const IS_VALID_ID: &str = "isValidId";
    /// Row count for a filter
    pub const GET_COUNT: &str = "getCount";
    /// Id list for a filter
    pub const GET_MANY: &str = "getMany";
}

struct ManagerInner<E: LiveEntity> {
    cache: ReadThroughCache,
    identity: IdentityCache<E>,
    store: Arc<dyn AuthoritativeStore>,
    loader: SingleFlight<EntityId, Option<Arc<E>>>,
}

/// Cache manager for one entity type
///
/// Cloning yields another handle to the same caches.
pub struct CacheManager<E: LiveEntity> {
    inner: Arc<ManagerInner<E>>,
}

impl<E: LiveEntity> Clone for CacheManager<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: LiveEntity> CacheManager<E> {
    /// Create a manager whose cache keys start with `namespace`
    pub fn new(
        namespace: &'static str,
        store: Arc<dyn AuthoritativeStore>,
        provider: Arc<dyn CacheProvider>,
        entry_config: CacheEntryConfig,
    ) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(ManagerInner {
                cache: ReadThroughCache::new(namespace, provider, entry_config)?,
                identity: IdentityCache::new(namespace),
                store,
                loader: SingleFlight::new(),
            }),
        })
    }

    /// Read-through cache of this type's namespace
    pub fn cache(&self) -> &ReadThroughCache {
        &self.inner.cache
    }

    /// Identity cache of this type
    pub fn identity(&self) -> &IdentityCache<E> {
        &self.inner.identity
    }

    /// Authoritative store
    pub fn store(&self) -> &Arc<dyn AuthoritativeStore> {
        &self.inner.store
    }

    /// Whether `entity` names an existing record (cached)
    pub async fn is_valid_id<'a>(&self, entity: impl Into<EntityRef<'a>>) -> Result<bool> {
        let id = resolve_id(entity)?;
        self.check_id(id).await
    }

    async fn check_id(&self, id: EntityId) -> Result<bool> {
        let store = Arc::clone(&self.inner.store);
        self.inner
            .cache
            .fetch(operations::IS_VALID_ID, &id.to_hex(), move || async move {
                Ok(store.count(E::Record::COLLECTION, &Filter::by_id(id)).await? > 0)
            })
            .await
    }

    /// Canonical record for `id`, read from the authoritative store
    pub async fn load_record(&self, id: EntityId) -> Result<Option<E::Record>> {
        let rows = self
            .inner
            .store
            .fetch_fields(E::Record::COLLECTION, &Filter::by_id(id), &[])
            .await
            .map_err(|e| {
                Error::database_with_source(format!("loading {} {id}", E::Record::COLLECTION), e)
            })?;
        rows.into_iter().next().map(decode_record).transpose()
    }

    /// The one live wrapper for the record's id, hydrated only when new
    pub fn wrap(&self, record: E::Record) -> Arc<E> {
        self.inner
            .identity
            .create_with(record.id(), move |entity| entity.hydrate(record))
    }

    /// Live wrapper for `entity`, loading it on first use
    ///
    /// Concurrent calls for an id that is not wrapped yet share one load.
    pub async fn get_by_id<'a>(&self, entity: impl Into<EntityRef<'a>>) -> Result<Option<Arc<E>>> {
        let id = resolve_id(entity)?;
        if let Some(existing) = self.inner.identity.get(&id) {
            return Ok(Some(existing));
        }
        let manager = self.clone();
        self.inner
            .loader
            .load(id, move || async move { manager.load_entity(id).await })
            .await
    }

    async fn load_entity(&self, id: EntityId) -> Result<Option<Arc<E>>> {
        if !self.check_id(id).await? {
            debug!(namespace = self.inner.cache.namespace(), %id, "unknown id");
            return Ok(None);
        }
        Ok(self.load_record(id).await?.map(|record| self.wrap(record)))
    }

    /// Ids matching `options`, cached under `operation`
    pub async fn ids<O: QueryOptions>(&self, operation: &str, options: &O) -> Result<Vec<EntityId>> {
        let store = Arc::clone(&self.inner.store);
        let filter = options.to_filter();
        self.inner
            .cache
            .fetch(operation, &options.fingerprint(), move || async move {
                fetch_ids(store.as_ref(), E::Record::COLLECTION, &filter).await
            })
            .await
    }

    /// Number of records matching `options`, cached under `operation`
    pub async fn count<O: QueryOptions>(&self, operation: &str, options: &O) -> Result<u64> {
        let store = Arc::clone(&self.inner.store);
        let filter = options.to_filter();
        self.inner
            .cache
            .fetch(operation, &options.fingerprint(), move || async move {
                store.count(E::Record::COLLECTION, &filter).await
            })
            .await
    }

    /// Live wrappers matching `options`, in id-list order
    ///
    /// The id list is cached; wrappers not live yet are loaded with one batch
    /// query. Ids whose record vanished since the list was cached are skipped.
    pub async fn get_many<O: QueryOptions>(&self, options: &O) -> Result<Vec<Arc<E>>> {
        let ids = self.ids(operations::GET_MANY, options).await?;
        let missing: Vec<EntityId> = ids
            .iter()
            .filter(|id| !self.inner.identity.contains(id))
            .copied()
            .collect();

        let mut loaded: HashMap<EntityId, Arc<E>> = HashMap::new();
        if !missing.is_empty() {
            let rows = self
                .inner
                .store
                .fetch_fields(E::Record::COLLECTION, &Filter::by_ids(missing), &[])
                .await
                .map_err(|e| {
                    Error::database_with_source(
                        format!("batch loading {}", E::Record::COLLECTION),
                        e,
                    )
                })?;
            for row in rows {
                let entity = self.wrap(decode_record(row)?);
                loaded.insert(entity.entity_id(), entity);
            }
        }

        Ok(ids
            .iter()
            .filter_map(|id| {
                loaded
                    .remove(id)
                    .or_else(|| self.inner.identity.get(id))
            })
            .collect())
    }

    /// Ids of every record of `game`, read directly from the store
    pub async fn list_ids_for_game(&self, game: EntityId) -> Result<Vec<EntityId>> {
        let filter = Filter::new().eq(fields::GAME, game);
        fetch_ids(self.inner.store.as_ref(), E::Record::COLLECTION, &filter)
            .await
            .map_err(|e| {
                Error::database_with_source(
                    format!("listing {} of game {game}", E::Record::COLLECTION),
                    e,
                )
            })
    }

    /// Drop every cached query result of the namespace and the wrappers
    /// nothing else references; returns the number of deleted keys
    pub async fn flush_namespace(&self) -> u64 {
        let removed = self.inner.cache.flush_namespace().await;
        self.inner.identity.clear(false);
        removed
    }

    /// Read-through counters of the namespace
    pub fn stats(&self) -> ReadThroughStats {
        self.inner.cache.stats()
    }
}

impl<E: LiveEntity> std::fmt::Debug for CacheManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("cache", &self.inner.cache)
            .field("identity", &self.inner.identity)
            .field("loader", &self.inner.loader)
            .finish()
    }
}

#[async_trait]
impl<E: LiveEntity> EntitySource<E> for CacheManager<E> {
    async fn is_valid_id(&self, id: EntityId) -> Result<bool> {
        self.check_id(id).await
    }

    async fn load_record(&self, id: EntityId) -> Result<Option<E::Record>> {
        CacheManager::load_record(self, id).await
    }

    fn wrap(&self, record: E::Record) -> Arc<E> {
        CacheManager::wrap(self, record)
    }

    async fn list_ids_for_game(&self, game: EntityId) -> Result<Vec<EntityId>> {
        CacheManager::list_ids_for_game(self, game).await
    }
}

fn decode_record<R: EntityRecord>(row: Document) -> Result<R> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Ids of the rows matching `filter`
pub(crate) async fn fetch_ids(
    store: &dyn AuthoritativeStore,
    collection: &str,
    filter: &Filter,
) -> Result<Vec<EntityId>> {
    let rows = store.fetch_fields(collection, filter, &[ID_FIELD]).await?;
    rows.into_iter()
        .map(|mut row| {
            let raw = row
                .remove(ID_FIELD)
                .ok_or_else(|| Error::internal(format!("{collection} row without {ID_FIELD}")))?;
            Ok(serde_json::from_value(raw)?)
        })
        .collect()
}
