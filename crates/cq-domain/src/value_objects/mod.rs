//! Value Objects
//!
//! Immutable domain values: identifiers, query shapes, filter options and
//! persisted records.

/// Entity identifiers
pub mod entity_id;
/// Manager filter options
pub mod filters;
/// Store query shapes
pub mod query;
/// Persisted records
pub mod records;

pub use entity_id::{EntityId, EntityRef, Identified, resolve_id};
pub use filters::{FactoryFilter, MembershipFilter, QueryOptions, TeamFilter};
pub use query::{Condition, Document, Filter, project};
pub use records::{EntityRecord, FactoryRecord, GeoPoint, MembershipRecord, TeamRecord};
