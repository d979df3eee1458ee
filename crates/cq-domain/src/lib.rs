//! # Domain Layer
//!
//! Core types shared by every Conquest crate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error enum and `Result` alias |
//! | [`value_objects`] | Entity ids, filters, query shapes, records |
//! | [`ports`] | Cache, store and live-entity contracts |
//! | [`constants`] | Collection names, field names, defaults |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{EntityId, EntityRef, resolve_id};
