//! Persisted entity records
//!
//! The canonical shape of each entity in the authoritative store. Live
//! wrappers are hydrated from these.

use crate::constants::collections;
use crate::value_objects::EntityId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record stored in one authoritative collection and scoped to a game
pub trait EntityRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection holding records of this type
    const COLLECTION: &'static str;

    /// Identifier of the record
    fn id(&self) -> EntityId;

    /// Game the record belongs to
    fn game_id(&self) -> EntityId;
}

/// Geographic position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// A production site placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryRecord {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub game: EntityId,
    #[serde(default)]
    pub team: Option<EntityId>,
    #[serde(default)]
    pub owner: Option<EntityId>,
    pub name: String,
    pub position: GeoPoint,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub resources: i64,
    /// Users that have seen this factory
    #[serde(default)]
    pub discovered_by: Vec<EntityId>,
}

impl EntityRecord for FactoryRecord {
    const COLLECTION: &'static str = collections::FACTORIES;

    fn id(&self) -> EntityId {
        self.id
    }

    fn game_id(&self) -> EntityId {
        self.game
    }
}

/// A team inside one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub game: EntityId,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl EntityRecord for TeamRecord {
    const COLLECTION: &'static str = collections::TEAMS;

    fn id(&self) -> EntityId {
        self.id
    }

    fn game_id(&self) -> EntityId {
        self.game
    }
}

/// Membership of a user in a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub user: EntityId,
    pub game: EntityId,
    #[serde(default)]
    pub team: Option<EntityId>,
    #[serde(default)]
    pub player: bool,
    #[serde(default)]
    pub spectator: bool,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub requested: bool,
}

impl EntityRecord for MembershipRecord {
    const COLLECTION: &'static str = collections::MEMBERSHIPS;

    fn id(&self) -> EntityId {
        self.id
    }

    fn game_id(&self) -> EntityId {
        self.game
    }
}
