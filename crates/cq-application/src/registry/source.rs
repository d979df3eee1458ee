//! Where a live registry gets its entities from

use async_trait::async_trait;
use cq_domain::error::Result;
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::EntityId;
use std::sync::Arc;

/// Loading steps a [`LiveRegistry`](super::LiveRegistry) delegates
///
/// Implemented by the cache manager of each entity type.
#[async_trait]
pub trait EntitySource<E: LiveEntity>: Send + Sync {
    /// Whether `id` names an existing record
    async fn is_valid_id(&self, id: EntityId) -> Result<bool>;

    /// Canonical record for `id`, bypassing the fast store
    async fn load_record(&self, id: EntityId) -> Result<Option<E::Record>>;

    /// The one live wrapper for the record's id, hydrated if new
    fn wrap(&self, record: E::Record) -> Arc<E>;

    /// Ids of every record belonging to `game`
    async fn list_ids_for_game(&self, game: EntityId) -> Result<Vec<EntityId>>;
}
