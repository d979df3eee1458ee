//! Application Layer - Conquest
//!
//! Keeps live game entities consistent with an authoritative store and a
//! fast expiring cache while many requests hit them concurrently.
//!
//! ## Layers
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`coordination`] | Fan-in latch, single-flight loader |
//! | [`cache`] | Cache keys, identity cache, read-through cache, per-type manager |
//! | [`registry`] | Per-game live registry |
//! | [`entities`] | Live wrappers: factories, teams, memberships |
//! | [`use_cases`] | Typed managers, game sessions |
//! | [`ports`] | Fast-store provider registry |
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `cq-domain`: errors, value objects and port traits
//! - Pure Rust libraries for async, serialization, etc.

pub mod cache;
pub mod coordination;
pub mod entities;
pub mod ports;
pub mod registry;
pub mod use_cases;

pub use cache::{CacheManager, IdentityCache, ReadThroughCache};
pub use coordination::{FanInLatch, LatchTicket, SingleFlight};
pub use entities::{Factory, Membership, Team};
pub use registry::{EntitySource, LiveRegistry};
pub use use_cases::*;
