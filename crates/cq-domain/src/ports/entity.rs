//! Live entity construction port
//!
//! A live entity is the in-memory, mutable wrapper of one persisted record.
//! Exactly one wrapper exists per identifier; it is bound to the id first and
//! hydrated from its record once.

use crate::error::Result;
use crate::value_objects::{EntityId, EntityRecord, Identified};
use async_trait::async_trait;

/// Live wrapper around a persisted record
#[async_trait]
pub trait LiveEntity: Identified + Send + Sync + 'static {
    /// Record the wrapper is hydrated from
    type Record: EntityRecord;

    /// Construct an empty wrapper bound to `id`
    fn bind(id: EntityId) -> Self
    where
        Self: Sized;

    /// Load state from the canonical record
    fn hydrate(&self, record: Self::Record);

    /// Game the wrapper currently belongs to, if hydrated
    fn game_id(&self) -> Option<EntityId>;

    /// Release resources held while loaded in a game
    fn release(&self) {}

    /// Whether `user` may see this entity
    async fn is_visible_to(&self, user: EntityId) -> Result<bool>;
}
