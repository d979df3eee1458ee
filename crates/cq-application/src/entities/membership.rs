//! Live user/game membership wrapper

use async_trait::async_trait;
use cq_domain::error::Result;
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::{EntityId, Identified, MembershipRecord};
use std::sync::RwLock;

use super::{read_state, write_state};

/// A membership loaded in memory
#[derive(Debug)]
pub struct Membership {
    id: EntityId,
    state: RwLock<Option<MembershipRecord>>,
}

impl Membership {
    pub fn record(&self) -> Option<MembershipRecord> {
        read_state(&self.state).clone()
    }

    pub fn user(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().map(|r| r.user)
    }

    pub fn team(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().and_then(|r| r.team)
    }

    /// Active player, as opposed to spectator or pending request
    pub fn is_player(&self) -> bool {
        read_state(&self.state).as_ref().is_some_and(|r| r.player)
    }

    pub fn is_requested(&self) -> bool {
        read_state(&self.state).as_ref().is_some_and(|r| r.requested)
    }
}

impl Identified for Membership {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

#[async_trait]
impl LiveEntity for Membership {
    type Record = MembershipRecord;

    fn bind(id: EntityId) -> Self {
        Self {
            id,
            state: RwLock::new(None),
        }
    }

    fn hydrate(&self, record: MembershipRecord) {
        *write_state(&self.state) = Some(record);
    }

    fn game_id(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().map(|r| r.game)
    }

    /// Memberships are listed on the game roster once loaded
    async fn is_visible_to(&self, _user: EntityId) -> Result<bool> {
        Ok(read_state(&self.state).is_some())
    }
}
