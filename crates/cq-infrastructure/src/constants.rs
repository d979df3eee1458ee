//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `cq_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "cq.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "cq";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CQ";

/// Separator between prefix, section and key in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_FILTER: &str = "CQ_LOG";

/// File name prefix of rotated log files
pub const LOG_FILE_PREFIX: &str = "cq";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Cache provider used when none is configured
pub const CACHE_DEFAULT_PROVIDER: &str = "moka";

/// Provider selected when caching is disabled
pub const CACHE_DISABLED_PROVIDER: &str = "null";

/// Provider that needs a connection URL
pub const CACHE_REDIS_PROVIDER: &str = "redis";

/// Default entry limit of in-process caches
pub const CACHE_DEFAULT_MAX_ENTRIES: u64 = 100_000;

/// Default seconds an unreachable distributed cache is skipped
pub const CACHE_DEFAULT_RETRY_AFTER_SECS: u64 = 5;
