//! # Conquest - Provider Implementations
//!
//! Implementations of the store ports defined in `cq-domain`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Cache | `CacheProvider` | Moka, Redis, Null |
//! | Store | `AuthoritativeStore` | InMemory |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! cq-providers = { version = "0.1", default-features = false, features = ["cache-moka"] }
//! ```
//!
//! Cache providers register themselves in
//! `cq_application::ports::registry::CACHE_PROVIDERS`; linking this crate is
//! enough to make them resolvable by name.

pub use cq_domain::error::{Error, Result};
pub use cq_domain::ports::{AuthoritativeStore, CacheProvider};

/// Provider-specific constants
pub mod constants;

/// Cache provider implementations
pub mod cache;

/// Authoritative store implementations
pub mod store;

pub use store::InMemoryDocumentStore;
