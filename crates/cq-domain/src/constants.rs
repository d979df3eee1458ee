//! Domain layer constants

/// Length of a textual entity identifier
pub const ENTITY_ID_HEX_LEN: usize = 24;

/// Identifier field of every stored document
pub const ID_FIELD: &str = "_id";

/// Default TTL for cache entries (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Authoritative store collections
pub mod collections {
    /// Factory records
    pub const FACTORIES: &str = "factories";
    /// Team records
    pub const TEAMS: &str = "teams";
    /// User/game membership records
    pub const MEMBERSHIPS: &str = "usergames";
}

/// Document field names used by filters
pub mod fields {
    pub const GAME: &str = "game";
    pub const TEAM: &str = "team";
    pub const OWNER: &str = "owner";
    pub const USER: &str = "user";
    pub const PLAYER: &str = "player";
    pub const SPECTATOR: &str = "spectator";
    pub const SPECIAL: &str = "special";
    pub const REQUESTED: &str = "requested";
}
