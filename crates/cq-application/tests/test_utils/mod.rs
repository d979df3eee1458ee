//! Shared test helpers for cq-application
//!
//! - [`CountingStore`]: authoritative store decorator counting reads, with
//!   optional latency and failure injection
//! - [`FailingCacheProvider`]: fast store whose every call fails
//! - record builders and a [`World`] bundling the managers over one store

#![allow(dead_code)]

use async_trait::async_trait;
use cq_application::use_cases::{FactoryManager, MembershipManager, TeamManager};
use cq_domain::error::{Error, Result};
use cq_domain::ports::{AuthoritativeStore, CacheEntryConfig, CacheProvider, CacheStats};
use cq_domain::value_objects::{
    Document, EntityId, FactoryRecord, Filter, GeoPoint, MembershipRecord, TeamRecord,
};
use cq_providers::InMemoryDocumentStore;
use cq_providers::cache::MokaCacheProvider;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Authoritative store decorator that counts reads
#[derive(Debug)]
pub struct CountingStore {
    inner: InMemoryDocumentStore,
    delay: Duration,
    fetches: AtomicUsize,
    counts: AtomicUsize,
    failing: AtomicBool,
    failing_counts: AtomicBool,
}

impl CountingStore {
    pub fn new(inner: InMemoryDocumentStore) -> Self {
        Self::with_delay(inner, Duration::ZERO)
    }

    /// Every read sleeps `delay` first, widening race windows
    pub fn with_delay(inner: InMemoryDocumentStore, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            fetches: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            failing_counts: AtomicBool::new(false),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    /// Total reads of either kind
    pub fn reads(&self) -> usize {
        self.fetches() + self.counts()
    }

    /// Make every read fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make only `count` fail
    pub fn set_failing_counts(&self, failing: bool) {
        self.failing_counts.store(failing, Ordering::SeqCst);
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::database("store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthoritativeStore for CountingStore {
    async fn fetch_fields(
        &self,
        collection: &str,
        filter: &Filter,
        projection: &[&str],
    ) -> Result<Vec<Document>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check()?;
        self.inner.fetch_fields(collection, filter, projection).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check()?;
        if self.failing_counts.load(Ordering::SeqCst) {
            return Err(Error::database("count unavailable"));
        }
        self.inner.count(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        self.inner.insert_one(collection, document).await
    }

    async fn remove_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        self.check()?;
        self.inner.remove_many(collection, filter).await
    }

    fn store_name(&self) -> &str {
        "counting"
    }
}

/// Fast store that fails every call
#[derive(Debug)]
pub struct FailingCacheProvider {
    ready: bool,
    attempts: AtomicUsize,
}

impl FailingCacheProvider {
    /// Reports ready, then fails
    pub fn new() -> Self {
        Self {
            ready: true,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Reports not ready
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::cache("fast store unreachable"))
    }
}

#[async_trait]
impl CacheProvider for FailingCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        self.fail()
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        self.fail()
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<u64> {
        self.fail()
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        self.fail()
    }

    async fn clear(&self) -> Result<()> {
        self.fail()
    }

    async fn stats(&self) -> Result<CacheStats> {
        self.fail()
    }

    async fn size(&self) -> Result<usize> {
        self.fail()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn provider_name(&self) -> &str {
        "failing"
    }
}

pub fn entry_config() -> CacheEntryConfig {
    CacheEntryConfig::new().with_ttl_secs(60)
}

pub fn factory_record(game: EntityId, owner: Option<EntityId>) -> FactoryRecord {
    FactoryRecord {
        id: EntityId::generate(),
        game,
        team: None,
        owner,
        name: "refinery".to_string(),
        position: GeoPoint {
            lat: 52.52,
            lng: 13.405,
        },
        level: 1,
        resources: 100,
        discovered_by: Vec::new(),
    }
}

pub fn team_record(game: EntityId, name: &str) -> TeamRecord {
    TeamRecord {
        id: EntityId::generate(),
        game,
        name: name.to_string(),
        color: "blue".to_string(),
    }
}

pub fn membership_record(
    user: EntityId,
    game: EntityId,
    team: Option<EntityId>,
    player: bool,
) -> MembershipRecord {
    MembershipRecord {
        id: EntityId::generate(),
        user,
        game,
        team,
        player,
        spectator: !player,
        special: false,
        requested: false,
    }
}

/// Managers wired over one counting store and one Moka cache
pub struct World {
    pub memory: InMemoryDocumentStore,
    pub store: Arc<CountingStore>,
    pub provider: Arc<dyn CacheProvider>,
    pub factories: FactoryManager,
    pub memberships: MembershipManager,
    pub teams: TeamManager,
}

impl World {
    pub fn new() -> Self {
        Self::build(Duration::ZERO, Arc::new(MokaCacheProvider::new()))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::build(delay, Arc::new(MokaCacheProvider::new()))
    }

    pub fn with_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self::build(Duration::ZERO, provider)
    }

    fn build(delay: Duration, provider: Arc<dyn CacheProvider>) -> Self {
        let memory = InMemoryDocumentStore::new();
        let store = Arc::new(CountingStore::with_delay(memory.clone(), delay));
        let authoritative: Arc<dyn AuthoritativeStore> = store.clone();
        let factories =
            FactoryManager::new(Arc::clone(&authoritative), Arc::clone(&provider), entry_config())
                .unwrap();
        let memberships = MembershipManager::new(
            Arc::clone(&authoritative),
            Arc::clone(&provider),
            entry_config(),
        )
        .unwrap();
        let teams = TeamManager::new(
            authoritative,
            Arc::clone(&provider),
            entry_config(),
            memberships.clone(),
        )
        .unwrap();
        Self {
            memory,
            store,
            provider,
            factories,
            memberships,
            teams,
        }
    }

    /// Insert a factory, returning its id
    pub fn add_factory(&self, game: EntityId, owner: Option<EntityId>) -> EntityId {
        let record = factory_record(game, owner);
        self.memory.insert_record(&record).unwrap();
        record.id
    }

    /// Wait for every pending cache write-back
    pub async fn settle(&self) {
        self.factories.cache_manager().cache().settle().await;
        self.teams.cache_manager().cache().settle().await;
        self.memberships.cache_manager().cache().settle().await;
    }
}
