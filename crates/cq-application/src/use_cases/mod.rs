//! Use Cases
//!
//! Typed managers per entity type and the game sessions that own live
//! registries.

pub mod factory_manager;
pub mod game_session;
pub mod membership_manager;
pub mod team_manager;

pub use factory_manager::{FACTORY_NAMESPACE, FactoryManager};
pub use game_session::{GameDirectory, GameSession};
pub use membership_manager::{MEMBERSHIP_NAMESPACE, MembershipManager};
pub use team_manager::{TEAM_NAMESPACE, TeamManager};
