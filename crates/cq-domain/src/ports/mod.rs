//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and external layers. Providers and
//! game-logic collaborators implement them; the application layer consumes
//! them.

/// Live entity construction
pub mod entity;
/// External service provider ports
pub mod providers;

pub use entity::LiveEntity;
pub use providers::{AuthoritativeStore, CacheEntryConfig, CacheProvider, CacheStats, glob_matches};
