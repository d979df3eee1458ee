//! Configuration management
//!
//! Layered configuration through Figment: built-in defaults, then a TOML
//! file, then `CQ__SECTION__KEY` environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, CacheConfig, LoggingConfig, RegistryConfig};
