//! Provider Constants
//!
//! Constants specific to provider implementations. Domain-wide defaults live
//! in `cq-domain`.

// ============================================================================
// CACHE PROVIDER CONSTANTS
// ============================================================================

/// Default entry limit of the in-process cache
pub const CACHE_DEFAULT_MAX_ENTRIES: u64 = 100_000;

/// Redis URI used when none is configured
pub const REDIS_DEFAULT_URI: &str = "redis://127.0.0.1:6379";

/// Seconds an unreachable Redis is skipped before the next attempt
pub const REDIS_DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Keys requested per SCAN round during pattern deletion
pub const REDIS_SCAN_BATCH: usize = 500;

// ============================================================================
// DOCUMENT STORE CONSTANTS
// ============================================================================

/// Name reported by the in-memory document store
pub const MEMORY_STORE_NAME: &str = "memory";
