//! Typed filter options accepted by the entity managers
//!
//! Every field is optional; `None` means "don't constrain on this field".
//! Each option struct produces two things from the same normalized view:
//! a store [`Filter`] and a cache fingerprint that spells out every
//! recognized field, unset ones included, in a fixed order.

use crate::constants::fields;
use crate::value_objects::{EntityId, Filter};
use serde::{Deserialize, Serialize};

/// Option struct that can be turned into a query and a cache fingerprint
pub trait QueryOptions {
    /// Canonical, order-stable rendering of every recognized field
    fn fingerprint(&self) -> String;

    /// Store filter equivalent to these options
    fn to_filter(&self) -> Filter;
}

/// Render one fingerprint segment for an optional identifier
fn id_segment(name: &str, value: Option<EntityId>) -> String {
    match value {
        Some(id) => format!("{name}={id}"),
        None => format!("{name}=*"),
    }
}

/// Render one fingerprint segment for a tri-state flag
fn flag_segment(name: &str, value: Option<bool>) -> String {
    let rendered = match value {
        Some(true) => "1",
        Some(false) => "0",
        None => "*",
    };
    format!("{name}={rendered}")
}

/// Filter options for factories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryFilter {
    /// Owning game
    pub game: Option<EntityId>,
    /// Owning team
    pub team: Option<EntityId>,
    /// Owning user
    pub owner: Option<EntityId>,
}

impl FactoryFilter {
    /// Factories of one game
    pub fn in_game(game: EntityId) -> Self {
        Self {
            game: Some(game),
            ..Self::default()
        }
    }
}

impl QueryOptions for FactoryFilter {
    fn fingerprint(&self) -> String {
        [
            id_segment(fields::GAME, self.game),
            id_segment(fields::TEAM, self.team),
            id_segment(fields::OWNER, self.owner),
        ]
        .join(";")
    }

    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt(fields::GAME, self.game)
            .eq_opt(fields::TEAM, self.team)
            .eq_opt(fields::OWNER, self.owner)
    }
}

/// Filter options for teams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFilter {
    /// Owning game
    pub game: Option<EntityId>,
}

impl QueryOptions for TeamFilter {
    fn fingerprint(&self) -> String {
        id_segment(fields::GAME, self.game)
    }

    fn to_filter(&self) -> Filter {
        Filter::new().eq_opt(fields::GAME, self.game)
    }
}

/// Filter options for user/game memberships
///
/// `requested = Some(true)` selects pending join requests only; it forces
/// `players`, `spectators` and `specials` to `Some(false)` during
/// [`normalized`](Self::normalized), whatever the caller passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipFilter {
    /// Game of the membership
    pub game: Option<EntityId>,
    /// Member user
    pub user: Option<EntityId>,
    /// Team of the member
    pub team: Option<EntityId>,
    /// Active players
    pub players: Option<bool>,
    /// Spectators
    pub spectators: Option<bool>,
    /// Special (administrative) members
    pub specials: Option<bool>,
    /// Pending join requests
    pub requested: Option<bool>,
}

impl MembershipFilter {
    /// Apply the `requested` override
    pub fn normalized(&self) -> Self {
        let mut normalized = *self;
        if normalized.requested == Some(true) {
            normalized.players = Some(false);
            normalized.spectators = Some(false);
            normalized.specials = Some(false);
        }
        normalized
    }

    /// Members of one team
    pub fn in_team(team: EntityId) -> Self {
        Self {
            team: Some(team),
            ..Self::default()
        }
    }
}

impl QueryOptions for MembershipFilter {
    fn fingerprint(&self) -> String {
        let n = self.normalized();
        [
            id_segment(fields::GAME, n.game),
            id_segment(fields::USER, n.user),
            id_segment(fields::TEAM, n.team),
            flag_segment(fields::PLAYER, n.players),
            flag_segment(fields::SPECTATOR, n.spectators),
            flag_segment(fields::SPECIAL, n.specials),
            flag_segment(fields::REQUESTED, n.requested),
        ]
        .join(";")
    }

    fn to_filter(&self) -> Filter {
        let n = self.normalized();
        Filter::new()
            .eq_opt(fields::GAME, n.game)
            .eq_opt(fields::USER, n.user)
            .eq_opt(fields::TEAM, n.team)
            .eq_opt(fields::PLAYER, n.players)
            .eq_opt(fields::SPECTATOR, n.spectators)
            .eq_opt(fields::SPECIAL, n.specials)
            .eq_opt(fields::REQUESTED, n.requested)
    }
}
