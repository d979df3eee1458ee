//! Team Manager Use Case
//!
//! Cached queries over teams. Team deletion is the one bulk mutation: it
//! removes the team with all its memberships and flushes both namespaces.

use crate::cache::{CacheManager, ReadThroughStats, operations};
use crate::entities::Team;
use crate::use_cases::MembershipManager;
use cq_domain::constants::fields;
use cq_domain::error::{Error, Result};
use cq_domain::ports::{AuthoritativeStore, CacheEntryConfig, CacheProvider};
use cq_domain::value_objects::{
    EntityRecord, EntityRef, Filter, MembershipFilter, MembershipRecord, QueryOptions, TeamFilter,
    TeamRecord, resolve_id,
};
use std::sync::Arc;
use tracing::info;

/// Cache namespace of team queries
pub const TEAM_NAMESPACE: &str = "team";

mod ops {
    pub const USER_COUNT: &str = "userCount";
}

/// Team queries and live wrappers
#[derive(Debug, Clone)]
pub struct TeamManager {
    manager: CacheManager<Team>,
    memberships: MembershipManager,
}

impl TeamManager {
    /// Create the manager; `memberships` is flushed along with teams
    pub fn new(
        store: Arc<dyn AuthoritativeStore>,
        provider: Arc<dyn CacheProvider>,
        entry_config: CacheEntryConfig,
        memberships: MembershipManager,
    ) -> Result<Self> {
        Ok(Self {
            manager: CacheManager::new(TEAM_NAMESPACE, store, provider, entry_config)?,
            memberships,
        })
    }

    pub async fn is_valid_id<'a>(&self, team: impl Into<EntityRef<'a>>) -> Result<bool> {
        self.manager.is_valid_id(team).await
    }

    pub async fn get_by_id<'a>(&self, team: impl Into<EntityRef<'a>>) -> Result<Option<Arc<Team>>> {
        self.manager.get_by_id(team).await
    }

    pub async fn get_count(&self, filter: &TeamFilter) -> Result<u64> {
        self.manager.count(operations::GET_COUNT, filter).await
    }

    pub async fn get_many(&self, filter: &TeamFilter) -> Result<Vec<Arc<Team>>> {
        self.manager.get_many(filter).await
    }

    /// Number of memberships of `team` matching `filter`
    ///
    /// Cached in the team namespace, so deleting the team drops it.
    pub async fn get_user_count<'a>(
        &self,
        team: impl Into<EntityRef<'a>>,
        filter: &MembershipFilter,
    ) -> Result<u64> {
        let team = resolve_id(team)?;
        let options = MembershipFilter {
            team: Some(team),
            ..filter.normalized()
        };
        let store = Arc::clone(self.manager.store());
        let query = options.to_filter();
        self.manager
            .cache()
            .fetch(ops::USER_COUNT, &options.fingerprint(), move || async move {
                store.count(MembershipRecord::COLLECTION, &query).await
            })
            .await
    }

    /// Remove `team` and its memberships, then flush both namespaces
    ///
    /// Returns whether the team existed.
    pub async fn delete_team<'a>(&self, team: impl Into<EntityRef<'a>>) -> Result<bool> {
        let team = resolve_id(team)?;
        let store = self.manager.store();
        let removed = store
            .remove_many(TeamRecord::COLLECTION, &Filter::by_id(team))
            .await
            .map_err(|e| Error::database_with_source(format!("deleting team {team}"), e))?;
        let members = store
            .remove_many(
                MembershipRecord::COLLECTION,
                &Filter::new().eq(fields::TEAM, team),
            )
            .await
            .map_err(|e| {
                Error::database_with_source(format!("deleting memberships of team {team}"), e)
            })?;

        self.manager.identity().remove(&team);
        self.flush_cache().await;
        self.memberships.flush_cache().await;
        info!(%team, existed = removed > 0, members, "team deleted");
        Ok(removed > 0)
    }

    /// Drop every cached team query; returns the number of deleted keys
    pub async fn flush_cache(&self) -> u64 {
        self.manager.flush_namespace().await
    }

    pub fn stats(&self) -> ReadThroughStats {
        self.manager.stats()
    }

    /// Underlying per-type manager
    pub fn cache_manager(&self) -> &CacheManager<Team> {
        &self.manager
    }
}
