//! Application bootstrap
//!
//! [`AppContext`] is the composition root: it resolves the fast store from
//! the linkme provider registry, builds one manager per entity type over the
//! shared stores, and keeps the active game sessions.
//!
//! ```text
//! AppConfig → resolve_cache_provider → CacheProvider ─┐
//!                                                     ├→ Managers → GameDirectory
//!               AuthoritativeStore (injected) ────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(AppConfig::default(), Arc::new(InMemoryDocumentStore::new()))?;
//! let session = context.activate_game(game_id).await?;
//! let visible = session.visible_factories(user_id).await?;
//! ```

use crate::config::AppConfig;
use crate::config::loader::validate_app_config;
use cq_application::ports::registry::resolve_cache_provider;
use cq_application::use_cases::{
    FactoryManager, GameDirectory, GameSession, MembershipManager, TeamManager,
};
use cq_domain::error::Result;
use cq_domain::ports::{AuthoritativeStore, CacheProvider};
use cq_domain::value_objects::{EntityId, EntityRef, FactoryFilter};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Application context owning the stores, managers and game sessions
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    cache_provider: Arc<dyn CacheProvider>,
    store: Arc<dyn AuthoritativeStore>,

    factories: FactoryManager,
    teams: TeamManager,
    memberships: MembershipManager,

    games: GameDirectory,
}

/// Outcome of [`AppContext::check`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextReport {
    /// Name of the resolved fast store
    pub cache_provider: String,
    /// Whether the fast store accepts requests right now
    pub cache_ready: bool,
    /// Entries held by the fast store, when it could tell
    pub cache_entries: Option<u64>,
    /// Name of the authoritative store
    pub store: String,
    /// Factories in the authoritative store
    pub factories: u64,
}

impl AppContext {
    /// Build the context for `config` over `store`
    pub fn new(config: AppConfig, store: Arc<dyn AuthoritativeStore>) -> Result<Self> {
        validate_app_config(&config)?;
        let cache_provider = resolve_cache_provider(&config.cache.provider_config())?;
        let entry_config = config.cache.entry_config();

        let factories = FactoryManager::new(
            Arc::clone(&store),
            Arc::clone(&cache_provider),
            entry_config.clone(),
        )?;
        let memberships = MembershipManager::new(
            Arc::clone(&store),
            Arc::clone(&cache_provider),
            entry_config.clone(),
        )?;
        let teams = TeamManager::new(
            Arc::clone(&store),
            Arc::clone(&cache_provider),
            entry_config,
            memberships.clone(),
        )?;
        let games = GameDirectory::new(factories.clone(), config.registry.preload_on_activate);

        info!(
            cache = cache_provider.provider_name(),
            store = store.store_name(),
            ttl_secs = config.cache.default_ttl_secs,
            preload = config.registry.preload_on_activate,
            "application context ready"
        );

        Ok(Self {
            config: Arc::new(config),
            cache_provider,
            store,
            factories,
            teams,
            memberships,
            games,
        })
    }

    /// Fast store shared by every manager
    pub fn cache_provider(&self) -> &Arc<dyn CacheProvider> {
        &self.cache_provider
    }

    /// Authoritative store
    pub fn store(&self) -> &Arc<dyn AuthoritativeStore> {
        &self.store
    }

    pub fn factories(&self) -> &FactoryManager {
        &self.factories
    }

    pub fn teams(&self) -> &TeamManager {
        &self.teams
    }

    pub fn memberships(&self) -> &MembershipManager {
        &self.memberships
    }

    /// Session of `game`, opening it on first use
    pub async fn activate_game<'a>(
        &self,
        game: impl Into<EntityRef<'a>>,
    ) -> Result<Arc<GameSession>> {
        self.games.activate(game).await
    }

    /// Close the session of `game`; `true` if it was active
    pub fn deactivate_game<'a>(&self, game: impl Into<EntityRef<'a>>) -> Result<bool> {
        self.games.deactivate(game)
    }

    /// Active session of `game`
    pub fn session(&self, game: &EntityId) -> Option<Arc<GameSession>> {
        self.games.session(game)
    }

    /// Ids of the active games, sorted
    pub fn active_games(&self) -> Vec<EntityId> {
        self.games.active_games()
    }

    /// Flush every manager's namespace; returns the number of deleted keys
    pub async fn flush_all_caches(&self) -> u64 {
        let removed = self.factories.flush_cache().await
            + self.teams.flush_cache().await
            + self.memberships.flush_cache().await;
        info!(removed, "all cache namespaces flushed");
        removed
    }

    /// Probe both stores
    ///
    /// Fast-store trouble is reported, not returned; an authoritative store
    /// failure is an error.
    pub async fn check(&self) -> Result<ContextReport> {
        let cache_entries = if self.cache_provider.is_ready() {
            match self.cache_provider.stats().await {
                Ok(stats) => Some(stats.entries),
                Err(e) => {
                    warn!(error = %e, "fast store stats unavailable");
                    None
                }
            }
        } else {
            None
        };
        let factories = self.factories.get_count(&FactoryFilter::default()).await?;
        Ok(ContextReport {
            cache_provider: self.cache_provider.provider_name().to_string(),
            cache_ready: self.cache_provider.is_ready(),
            cache_entries,
            store: self.store.store_name().to_string(),
            factories,
        })
    }

    /// Close every game session; returns how many were active
    pub fn shutdown(&self) -> usize {
        let closed = self.games.close_all();
        info!(closed, "application context shut down");
        closed
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("cache_provider", &self.cache_provider.provider_name())
            .field("store", &self.store.store_name())
            .field("active_games", &self.games.active_games().len())
            .finish_non_exhaustive()
    }
}

/// Build the application context
pub fn init_app(config: AppConfig, store: Arc<dyn AuthoritativeStore>) -> Result<AppContext> {
    AppContext::new(config, store)
}
