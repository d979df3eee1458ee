//! Game Sessions
//!
//! A session is one active game: it owns the game's live factory registry.
//! [`GameDirectory`] keeps the active sessions and makes concurrent
//! activations of the same game share one session.

use crate::coordination::SingleFlight;
use crate::entities::Factory;
use crate::registry::LiveRegistry;
use crate::use_cases::FactoryManager;
use cq_domain::error::Result;
use cq_domain::value_objects::{EntityId, EntityRef, resolve_id};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// One active game
#[derive(Debug)]
pub struct GameSession {
    game: EntityId,
    factories: LiveRegistry<Factory>,
}

impl GameSession {
    /// Open a session for `game`, loading its factories when `preload` is set
    pub async fn open(game: EntityId, factories: &FactoryManager, preload: bool) -> Result<Self> {
        let session = Self {
            game,
            factories: factories.registry_for(game),
        };
        if preload {
            session.factories.load_all().await?;
        }
        info!(%game, preload, "game session opened");
        Ok(session)
    }

    pub fn game(&self) -> EntityId {
        self.game
    }

    /// Live factory registry of the game
    pub fn factories(&self) -> &LiveRegistry<Factory> {
        &self.factories
    }

    /// Factory of this game, loading it if needed
    pub async fn factory<'a>(&self, factory: impl Into<EntityRef<'a>>) -> Result<Option<Arc<Factory>>> {
        self.factories.get(factory).await
    }

    /// Loaded factories `user` can see
    pub async fn visible_factories<'a>(
        &self,
        user: impl Into<EntityRef<'a>>,
    ) -> Result<Vec<Arc<Factory>>> {
        self.factories.visible_to(user).await
    }

    /// Unload everything; returns the number of released factories
    pub fn close(&self) -> usize {
        let released = self.factories.unload_all();
        info!(game = %self.game, released, "game session closed");
        released
    }
}

/// Active game sessions of the process
#[derive(Debug)]
pub struct GameDirectory {
    factories: FactoryManager,
    preload: bool,
    sessions: Arc<DashMap<EntityId, Arc<GameSession>>>,
    activations: SingleFlight<EntityId, Arc<GameSession>>,
}

impl GameDirectory {
    pub fn new(factories: FactoryManager, preload: bool) -> Self {
        Self {
            factories,
            preload,
            sessions: Arc::new(DashMap::new()),
            activations: SingleFlight::new(),
        }
    }

    /// Session of `game`, opening it if the game is not active yet
    pub async fn activate<'a>(&self, game: impl Into<EntityRef<'a>>) -> Result<Arc<GameSession>> {
        let game = resolve_id(game)?;
        if let Some(session) = self.session(&game) {
            return Ok(session);
        }
        let factories = self.factories.clone();
        let sessions = Arc::clone(&self.sessions);
        let preload = self.preload;
        self.activations
            .load(game, move || async move {
                if let Some(session) = sessions.get(&game) {
                    return Ok(Arc::clone(session.value()));
                }
                let session = Arc::new(GameSession::open(game, &factories, preload).await?);
                sessions.insert(game, Arc::clone(&session));
                Ok(session)
            })
            .await
    }

    /// Close and forget the session of `game`; `true` if it was active
    pub fn deactivate<'a>(&self, game: impl Into<EntityRef<'a>>) -> Result<bool> {
        let game = resolve_id(game)?;
        Ok(match self.sessions.remove(&game) {
            Some((_, session)) => {
                session.close();
                true
            }
            None => false,
        })
    }

    /// Active session of `game`
    pub fn session(&self, game: &EntityId) -> Option<Arc<GameSession>> {
        self.sessions
            .get(game)
            .map(|session| Arc::clone(session.value()))
    }

    /// Ids of the active games, sorted
    pub fn active_games(&self) -> Vec<EntityId> {
        let mut games: Vec<EntityId> = self.sessions.iter().map(|entry| *entry.key()).collect();
        games.sort();
        games
    }

    /// Close every session; returns how many were active
    pub fn close_all(&self) -> usize {
        let games = self.active_games();
        for game in &games {
            if let Some((_, session)) = self.sessions.remove(game) {
                session.close();
            }
        }
        games.len()
    }
}
