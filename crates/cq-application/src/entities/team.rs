//! Live team wrapper

use async_trait::async_trait;
use cq_domain::error::{Error, Result};
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::{EntityId, Identified, TeamRecord};
use std::sync::RwLock;

use super::{read_state, write_state};

/// A team loaded in memory
#[derive(Debug)]
pub struct Team {
    id: EntityId,
    state: RwLock<Option<TeamRecord>>,
}

impl Team {
    pub fn record(&self) -> Option<TeamRecord> {
        read_state(&self.state).clone()
    }

    pub fn name(&self) -> Option<String> {
        read_state(&self.state).as_ref().map(|r| r.name.clone())
    }

    pub fn color(&self) -> Option<String> {
        read_state(&self.state).as_ref().map(|r| r.color.clone())
    }

    /// Change the team color
    pub fn set_color(&self, color: impl Into<String>) -> Result<()> {
        let mut state = write_state(&self.state);
        let record = state
            .as_mut()
            .ok_or_else(|| Error::not_found(format!("team {} state", self.id)))?;
        record.color = color.into();
        Ok(())
    }
}

impl Identified for Team {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

#[async_trait]
impl LiveEntity for Team {
    type Record = TeamRecord;

    fn bind(id: EntityId) -> Self {
        Self {
            id,
            state: RwLock::new(None),
        }
    }

    fn hydrate(&self, record: TeamRecord) {
        *write_state(&self.state) = Some(record);
    }

    fn game_id(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().map(|r| r.game)
    }

    /// Teams are public
    async fn is_visible_to(&self, _user: EntityId) -> Result<bool> {
        Ok(true)
    }
}
