//! Caching layers
//!
//! | Layer | Purpose |
//! |-------|---------|
//! | [`CacheKey`] | `{namespace}:{operation}:{fingerprint}` keys |
//! | [`IdentityCache`] | One live wrapper per id |
//! | [`ReadThroughCache`] | Fast store first, authoritative store on miss |
//! | [`CacheManager`] | All of the above for one entity type |

pub mod identity;
pub mod key;
pub mod manager;
pub mod read_through;

pub use identity::IdentityCache;
pub use key::CacheKey;
pub use manager::{CacheManager, operations};
pub use read_through::{ReadThroughCache, ReadThroughStats};
