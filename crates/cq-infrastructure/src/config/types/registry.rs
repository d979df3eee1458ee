//! Live registry configuration types

use serde::{Deserialize, Serialize};

/// Live registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Load every entity of a game when its session opens
    pub preload_on_activate: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            preload_on_activate: true,
        }
    }
}
