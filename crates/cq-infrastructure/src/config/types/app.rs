//! Main application configuration

use super::{CacheConfig, LoggingConfig, RegistryConfig};
use serde::{Deserialize, Serialize};

/// Root configuration of the process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Fast-store configuration
    pub cache: CacheConfig,
    /// Live registry configuration
    pub registry: RegistryConfig,
}
