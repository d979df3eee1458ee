//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | CacheProvider | Fast, expiring key/value store |
//! | AuthoritativeStore | Durable source of truth |

/// Cache provider port
pub mod cache;
/// Authoritative store port
pub mod store;

pub use cache::{CacheEntryConfig, CacheProvider, CacheStats, glob_matches};
pub use store::AuthoritativeStore;
