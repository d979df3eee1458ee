//! Per-game live registries

pub mod live_registry;
pub mod source;

pub use live_registry::LiveRegistry;
pub use source::EntitySource;
