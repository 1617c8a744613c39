//! Candidate player and roster-member data model.
//!
//! `Player` is the immutable record supplied by the external player-data
//! collaborator; `SquadPlayer` augments it with roster-membership state
//! (starter flag, captaincy, bench order).

use serde::{Deserialize, Serialize};

/// The four roster positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    GK,
    DEF,
    MID,
    FWD,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::GK, Position::DEF, Position::MID, Position::FWD];

    /// Exact per-position squad quota at full size (also the incremental ceiling).
    pub fn quota(&self) -> usize {
        match self {
            Position::GK => 2,
            Position::DEF => 5,
            Position::MID => 5,
            Position::FWD => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::DEF => "DEF",
            Position::MID => "MID",
            Position::FWD => "FWD",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five fixed league codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueCode {
    /// Premier League
    PL,
    /// La Liga
    LL,
    /// Serie A
    SA,
    /// Bundesliga
    BL,
    /// Ligue 1
    FL1,
}

impl LeagueCode {
    pub const ALL: [LeagueCode; 5] = [
        LeagueCode::PL,
        LeagueCode::LL,
        LeagueCode::SA,
        LeagueCode::BL,
        LeagueCode::FL1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeagueCode::PL => "PL",
            LeagueCode::LL => "LL",
            LeagueCode::SA => "SA",
            LeagueCode::BL => "BL",
            LeagueCode::FL1 => "FL1",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeagueCode::PL => "Premier League",
            LeagueCode::LL => "La Liga",
            LeagueCode::SA => "Serie A",
            LeagueCode::BL => "Bundesliga",
            LeagueCode::FL1 => "Ligue 1",
        }
    }
}

impl std::fmt::Display for LeagueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A draftable athlete as supplied by the player catalog. Read-only from the
/// engine's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique, stable catalog id.
    pub id: String,
    pub name: String,
    /// Club name.
    pub team: String,
    pub league: LeagueCode,
    pub position: Position,
    /// Price in currency units (millions), non-negative.
    pub price: f32,
    /// Season score used as a value signal, non-negative.
    pub points: f32,
}

impl Player {
    /// Value ranking signal: points per unit of price. A free player is
    /// ranked by raw points so that a zero price never divides.
    pub fn value(&self) -> f32 {
        if self.price > 0.0 {
            self.points / self.price
        } else {
            self.points
        }
    }
}

/// A catalog player augmented with roster-membership state.
///
/// Invariants (enforced by the roster, not by this struct): at most one
/// captain and one vice-captain in a roster, never the same player;
/// `bench_order` is `Some` iff `is_starter` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub is_starter: bool,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    /// Substitute priority, 1-based and dense among bench members.
    pub bench_order: Option<u8>,
}

impl From<Player> for SquadPlayer {
    fn from(player: Player) -> Self {
        Self {
            player,
            is_starter: false,
            is_captain: false,
            is_vice_captain: false,
            bench_order: None,
        }
    }
}

impl SquadPlayer {
    pub fn id(&self) -> &str {
        &self.player.id
    }

    pub fn position(&self) -> Position {
        self.player.position
    }

    pub fn league(&self) -> LeagueCode {
        self.player.league
    }

    pub fn price(&self) -> f32 {
        self.player.price
    }
}
