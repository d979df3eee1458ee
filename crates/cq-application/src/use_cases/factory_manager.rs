//! Factory Manager Use Case
//!
//! Cached queries over factories, plus the entity source every game's
//! live registry loads factories through.

use crate::cache::{CacheManager, ReadThroughStats, operations};
use crate::entities::Factory;
use crate::registry::{EntitySource, LiveRegistry};
use cq_domain::error::Result;
use cq_domain::ports::{AuthoritativeStore, CacheEntryConfig, CacheProvider};
use cq_domain::value_objects::{EntityId, EntityRef, FactoryFilter};
use std::sync::Arc;

/// Cache namespace of factory queries
pub const FACTORY_NAMESPACE: &str = "factory";

/// Factory queries and live wrappers
#[derive(Debug, Clone)]
pub struct FactoryManager {
    manager: CacheManager<Factory>,
}

impl FactoryManager {
    /// Create the manager over the given stores
    pub fn new(
        store: Arc<dyn AuthoritativeStore>,
        provider: Arc<dyn CacheProvider>,
        entry_config: CacheEntryConfig,
    ) -> Result<Self> {
        Ok(Self {
            manager: CacheManager::new(FACTORY_NAMESPACE, store, provider, entry_config)?,
        })
    }

    pub async fn is_valid_id<'a>(&self, factory: impl Into<EntityRef<'a>>) -> Result<bool> {
        self.manager.is_valid_id(factory).await
    }

    pub async fn get_by_id<'a>(
        &self,
        factory: impl Into<EntityRef<'a>>,
    ) -> Result<Option<Arc<Factory>>> {
        self.manager.get_by_id(factory).await
    }

    pub async fn get_count(&self, filter: &FactoryFilter) -> Result<u64> {
        self.manager.count(operations::GET_COUNT, filter).await
    }

    pub async fn get_many(&self, filter: &FactoryFilter) -> Result<Vec<Arc<Factory>>> {
        self.manager.get_many(filter).await
    }

    /// Ids of every factory of `game`, uncached
    pub async fn list_ids_for_game(&self, game: EntityId) -> Result<Vec<EntityId>> {
        self.manager.list_ids_for_game(game).await
    }

    /// Drop every cached factory query; returns the number of deleted keys
    pub async fn flush_cache(&self) -> u64 {
        self.manager.flush_namespace().await
    }

    /// Source a live registry loads factories from
    pub fn source(&self) -> Arc<dyn EntitySource<Factory>> {
        Arc::new(self.manager.clone())
    }

    /// Empty live registry for `game`
    pub fn registry_for(&self, game: EntityId) -> LiveRegistry<Factory> {
        LiveRegistry::new(game, self.source())
    }

    pub fn stats(&self) -> ReadThroughStats {
        self.manager.stats()
    }

    /// Underlying per-type manager
    pub fn cache_manager(&self) -> &CacheManager<Factory> {
        &self.manager
    }
}
