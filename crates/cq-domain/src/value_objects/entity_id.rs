//! Entity identifiers and identifier normalization
//!
//! Every persisted entity is addressed by a 12-byte [`EntityId`], written as
//! 24 lowercase hex characters. Public entry points accept anything that can
//! become an [`EntityRef`] and normalize it once with [`resolve_id`].

use crate::constants::ENTITY_ID_HEX_LEN;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

/// Per-process counter seeded randomly, mixed into generated ids
static ID_COUNTER: LazyLock<AtomicU32> =
    LazyLock::new(|| AtomicU32::new(rand::random::<u32>() & 0x00FF_FFFF));

/// Opaque, globally unique entity identifier
///
/// Layout: 4-byte big-endian unix timestamp, 5 random bytes, 3-byte counter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId([u8; 12]);

impl EntityId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX);
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&rand::random::<[u8; 5]>());
        let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    /// Build an identifier from raw bytes
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the identifier
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Parse a 24-character hex identifier
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() != ENTITY_ID_HEX_LEN {
            return Err(Error::invalid_argument(format!(
                "entity id must be {ENTITY_ID_HEX_LEN} hex characters, got {:?}",
                input
            )));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(input, &mut bytes).map_err(|e| {
            Error::invalid_argument(format!("entity id {:?} is not valid hex: {}", input, e))
        })?;
        Ok(Self(bytes))
    }

    /// Hex representation of the identifier
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.to_hex())
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl From<EntityId> for serde_json::Value {
    fn from(id: EntityId) -> Self {
        serde_json::Value::String(id.to_hex())
    }
}

/// Anything carrying a stable entity identifier
pub trait Identified {
    /// The identifier of this entity
    fn entity_id(&self) -> EntityId;
}

/// An entity given either as an identifier, as text, or as a live object
#[derive(Debug, Clone)]
pub enum EntityRef<'a> {
    /// Already-parsed identifier
    Id(EntityId),
    /// Borrowed textual identifier
    Text(&'a str),
    /// Owned textual identifier
    Owned(String),
}

impl From<EntityId> for EntityRef<'_> {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

impl From<&EntityId> for EntityRef<'_> {
    fn from(id: &EntityId) -> Self {
        Self::Id(*id)
    }
}

impl<'a> From<&'a str> for EntityRef<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for EntityRef<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl From<String> for EntityRef<'_> {
    fn from(text: String) -> Self {
        Self::Owned(text)
    }
}

impl<T: Identified + ?Sized> From<&Arc<T>> for EntityRef<'_> {
    fn from(entity: &Arc<T>) -> Self {
        Self::Id(entity.entity_id())
    }
}

/// Normalize an entity reference into an identifier
///
/// Malformed text is rejected here, before any store is touched.
pub fn resolve_id<'a>(input: impl Into<EntityRef<'a>>) -> Result<EntityId> {
    match input.into() {
        EntityRef::Id(id) => Ok(id),
        EntityRef::Text(text) => EntityId::parse(text.trim()),
        EntityRef::Owned(text) => EntityId::parse(text.trim()),
    }
}
