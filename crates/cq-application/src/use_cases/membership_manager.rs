//! Membership Manager Use Case
//!
//! Cached queries over user/game memberships. Filters go through
//! [`MembershipFilter::normalized`] before key and query construction, so a
//! `requested` query never mixes in players, spectators or specials.

use crate::cache::manager::fetch_ids;
use crate::cache::{CacheManager, ReadThroughStats, operations};
use crate::entities::Membership;
use cq_domain::constants::fields;
use cq_domain::error::Result;
use cq_domain::ports::{AuthoritativeStore, CacheEntryConfig, CacheProvider};
use cq_domain::value_objects::{
    EntityId, EntityRecord, EntityRef, Filter, MembershipFilter, MembershipRecord, resolve_id,
};
use std::sync::Arc;

/// Cache namespace of membership queries
pub const MEMBERSHIP_NAMESPACE: &str = "userGame";

mod ops {
    pub const FIND_BY_USER_AND_GAME: &str = "findByUserAndGame";

    #[inline]
    pub fn user_and_game(user: &str, game: &str) -> String {
        format!("user={user};game={game}")
    }
}

/// Membership queries and live wrappers
#[derive(Debug, Clone)]
pub struct MembershipManager {
    manager: CacheManager<Membership>,
}

impl MembershipManager {
    /// Create the manager over the given stores
    pub fn new(
        store: Arc<dyn AuthoritativeStore>,
        provider: Arc<dyn CacheProvider>,
        entry_config: CacheEntryConfig,
    ) -> Result<Self> {
        Ok(Self {
            manager: CacheManager::new(MEMBERSHIP_NAMESPACE, store, provider, entry_config)?,
        })
    }

    pub async fn is_valid_id<'a>(&self, membership: impl Into<EntityRef<'a>>) -> Result<bool> {
        self.manager.is_valid_id(membership).await
    }

    pub async fn get_by_id<'a>(
        &self,
        membership: impl Into<EntityRef<'a>>,
    ) -> Result<Option<Arc<Membership>>> {
        self.manager.get_by_id(membership).await
    }

    pub async fn get_count(&self, filter: &MembershipFilter) -> Result<u64> {
        self.manager
            .count(operations::GET_COUNT, &filter.normalized())
            .await
    }

    pub async fn get_many(&self, filter: &MembershipFilter) -> Result<Vec<Arc<Membership>>> {
        self.manager.get_many(&filter.normalized()).await
    }

    /// Membership of `user` in `game`, if any
    ///
    /// The id lookup is cached, including the "no membership" answer.
    pub async fn find_by_user_and_game<'a, 'b>(
        &self,
        user: impl Into<EntityRef<'a>>,
        game: impl Into<EntityRef<'b>>,
    ) -> Result<Option<Arc<Membership>>> {
        let user = resolve_id(user)?;
        let game = resolve_id(game)?;
        let store = Arc::clone(self.manager.store());
        let found: Option<EntityId> = self
            .manager
            .cache()
            .fetch(
                ops::FIND_BY_USER_AND_GAME,
                &ops::user_and_game(&user.to_hex(), &game.to_hex()),
                move || async move {
                    let filter = Filter::new().eq(fields::USER, user).eq(fields::GAME, game);
                    let ids =
                        fetch_ids(store.as_ref(), MembershipRecord::COLLECTION, &filter).await?;
                    Ok(ids.into_iter().min())
                },
            )
            .await?;
        match found {
            Some(id) => self.manager.get_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Whether `user` is an active player of `game`
    pub async fn is_player<'a, 'b>(
        &self,
        user: impl Into<EntityRef<'a>>,
        game: impl Into<EntityRef<'b>>,
    ) -> Result<bool> {
        Ok(self
            .find_by_user_and_game(user, game)
            .await?
            .is_some_and(|membership| membership.is_player()))
    }

    /// Drop every cached membership query; returns the number of deleted keys
    pub async fn flush_cache(&self) -> u64 {
        self.manager.flush_namespace().await
    }

    pub fn stats(&self) -> ReadThroughStats {
        self.manager.stats()
    }

    /// Underlying per-type manager
    pub fn cache_manager(&self) -> &CacheManager<Membership> {
        &self.manager
    }
}
