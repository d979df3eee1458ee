//! Application Port Interfaces
//!
//! - **registry/** - Auto-registration system for fast-store providers

/// Provider registry for dynamic provider discovery
pub mod registry;

pub use registry::{
    CacheProviderConfig, CacheProviderEntry, list_cache_providers, resolve_cache_provider,
};
