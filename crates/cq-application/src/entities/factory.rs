//! Live factory wrapper

use async_trait::async_trait;
use cq_domain::error::{Error, Result};
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::{EntityId, FactoryRecord, GeoPoint, Identified};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError, RwLock};

use super::{read_state, write_state};

/// A factory loaded in memory
///
/// Mutators apply their change under one write lock, so a read-modify-write
/// never interleaves with another mutation of the same factory.
#[derive(Debug)]
pub struct Factory {
    id: EntityId,
    state: RwLock<Option<FactoryRecord>>,
    /// Users currently following this factory on the map
    watchers: Mutex<HashSet<EntityId>>,
}

impl Factory {
    /// Snapshot of the current state, if hydrated
    pub fn record(&self) -> Option<FactoryRecord> {
        read_state(&self.state).clone()
    }

    /// Whether the wrapper has been hydrated
    pub fn is_hydrated(&self) -> bool {
        read_state(&self.state).is_some()
    }

    pub fn name(&self) -> Option<String> {
        read_state(&self.state).as_ref().map(|r| r.name.clone())
    }

    pub fn owner(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().and_then(|r| r.owner)
    }

    pub fn team(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().and_then(|r| r.team)
    }

    pub fn position(&self) -> Option<GeoPoint> {
        read_state(&self.state).as_ref().map(|r| r.position)
    }

    pub fn level(&self) -> u32 {
        read_state(&self.state).as_ref().map_or(0, |r| r.level)
    }

    pub fn resources(&self) -> i64 {
        read_state(&self.state).as_ref().map_or(0, |r| r.resources)
    }

    /// Apply `change` to the hydrated state under the write lock
    pub fn update<R>(&self, change: impl FnOnce(&mut FactoryRecord) -> Result<R>) -> Result<R> {
        let mut state = write_state(&self.state);
        let record = state
            .as_mut()
            .ok_or_else(|| Error::not_found(format!("factory {} state", self.id)))?;
        change(record)
    }

    /// Add resources, returning the new balance
    pub fn deposit(&self, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(Error::invalid_argument(format!(
                "deposit must be positive, got {amount}"
            )));
        }
        self.update(|record| {
            record.resources = record.resources.saturating_add(amount);
            Ok(record.resources)
        })
    }

    /// Take resources, returning the new balance
    pub fn withdraw(&self, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(Error::invalid_argument(format!(
                "withdrawal must be positive, got {amount}"
            )));
        }
        self.update(|record| {
            if record.resources < amount {
                return Err(Error::invalid_argument(format!(
                    "factory {} holds {} resources, {amount} requested",
                    record.id, record.resources
                )));
            }
            record.resources -= amount;
            Ok(record.resources)
        })
    }

    /// Hand the factory to a new owner and team
    pub fn set_owner(&self, owner: Option<EntityId>, team: Option<EntityId>) -> Result<()> {
        self.update(|record| {
            record.owner = owner;
            record.team = team;
            Ok(())
        })
    }

    /// Mark the factory as seen by `user`; `true` on first discovery
    pub fn discover(&self, user: EntityId) -> Result<bool> {
        self.update(|record| {
            if record.discovered_by.contains(&user) {
                return Ok(false);
            }
            record.discovered_by.push(user);
            Ok(true)
        })
    }

    /// Start following the factory; `true` if `user` was not following yet
    pub fn watch(&self, user: EntityId) -> bool {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user)
    }

    /// Users following the factory
    pub fn watchers(&self) -> Vec<EntityId> {
        let mut watchers: Vec<EntityId> = self
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        watchers.sort();
        watchers
    }
}

impl Identified for Factory {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

#[async_trait]
impl LiveEntity for Factory {
    type Record = FactoryRecord;

    fn bind(id: EntityId) -> Self {
        Self {
            id,
            state: RwLock::new(None),
            watchers: Mutex::new(HashSet::new()),
        }
    }

    fn hydrate(&self, record: FactoryRecord) {
        *write_state(&self.state) = Some(record);
    }

    fn game_id(&self) -> Option<EntityId> {
        read_state(&self.state).as_ref().map(|r| r.game)
    }

    fn release(&self) {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Owners and users who discovered the factory can see it
    async fn is_visible_to(&self, user: EntityId) -> Result<bool> {
        Ok(read_state(&self.state).as_ref().is_some_and(|record| {
            record.owner == Some(user) || record.discovered_by.contains(&user)
        }))
    }
}
