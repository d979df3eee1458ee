//! # Conquest
//!
//! Live entity registry and read-through caching for a location-based
//! strategy game.
//!
//! ## Example
//!
//! ```ignore
//! use cq::infrastructure::{AppConfig, init_app};
//! use cq::providers::InMemoryDocumentStore;
//! use std::sync::Arc;
//!
//! let context = init_app(AppConfig::default(), Arc::new(InMemoryDocumentStore::new()))?;
//! let session = context.activate_game(game_id).await?;
//! let factory = session.factory(factory_id).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - errors, ids, records and port traits
//! - `application` - latch, single-flight, caches, live registries, managers
//! - `providers` - fast-store providers and the in-memory document store
//! - `infrastructure` - configuration, logging and the application context

/// Domain layer - errors, value objects and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use cq_domain::*;
}

/// Application layer - coordination, caches, registries and managers
pub mod application {
    pub use cq_application::*;
}

/// Provider implementations
pub mod providers {
    pub use cq_providers::*;
}

/// Infrastructure layer - config, logging and bootstrap
pub mod infrastructure {
    pub use cq_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use domain::{EntityId, EntityRef, Error, Result};
pub use infrastructure::{AppConfig, AppContext, init_app};
