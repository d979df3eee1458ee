//! Provider Registry System
//!
//! Compile-time registration of fast-store providers through `linkme`
//! distributed slices, resolved by name at runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Provider Registration Flow                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Provider defines:  #[linkme::distributed_slice(PROVIDERS)]  │
//! │                        static ENTRY: ProviderEntry = ...        │
//! │                              ↓                                  │
//! │  2. Registry declares: #[linkme::distributed_slice]             │
//! │                        pub static PROVIDERS: [Entry] = [..]     │
//! │                              ↓                                  │
//! │  3. Resolver queries:  PROVIDERS.iter()                         │
//! │                              ↓                                  │
//! │  4. Config selects:    "provider = moka" → MokaCacheProvider    │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Registering a Provider (in cq-providers)
//!
//! ```ignore
//! use cq_application::ports::registry::{CacheProviderEntry, CACHE_PROVIDERS};
//!
//! #[linkme::distributed_slice(CACHE_PROVIDERS)]
//! static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
//!     name: "moka",
//!     description: "In-process cache with per-entry TTL",
//!     factory: |config| Ok(Arc::new(MokaCacheProvider::from_config(config))),
//! };
//! ```
//!
//! ### Resolving a Provider (in cq-infrastructure)
//!
//! ```ignore
//! use cq_application::ports::registry::resolve_cache_provider;
//!
//! let provider = resolve_cache_provider(&CacheProviderConfig::new("moka"))?;
//! ```

pub mod cache;

pub use cache::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};
