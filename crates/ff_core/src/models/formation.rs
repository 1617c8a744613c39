use serde::{Deserialize, Serialize};

use super::player::Position;
use crate::error::SquadError;

/// Starting-XI shape: DEF-MID-FWD slot distribution, GK fixed at 1.
/// Only the seven permitted shapes exist; each sums to 10 outfield starters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Formation {
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "5-4-1")]
    F541,
}

impl Formation {
    pub const ALL: [Formation; 7] = [
        Formation::F343,
        Formation::F352,
        Formation::F433,
        Formation::F442,
        Formation::F451,
        Formation::F532,
        Formation::F541,
    ];

    /// Returns (defenders, midfielders, forwards).
    pub fn positions(&self) -> (u8, u8, u8) {
        match self {
            Formation::F343 => (3, 4, 3),
            Formation::F352 => (3, 5, 2),
            Formation::F433 => (4, 3, 3),
            Formation::F442 => (4, 4, 2),
            Formation::F451 => (4, 5, 1),
            Formation::F532 => (5, 3, 2),
            Formation::F541 => (5, 4, 1),
        }
    }

    /// Per-position starter ceiling under this formation.
    pub fn starter_slots(&self, position: Position) -> usize {
        let (def, mid, fwd) = self.positions();
        match position {
            Position::GK => 1,
            Position::DEF => def as usize,
            Position::MID => mid as usize,
            Position::FWD => fwd as usize,
        }
    }

    /// Canonical formation code string (e.g., "4-3-3").
    pub fn code(&self) -> &'static str {
        match self {
            Formation::F343 => "3-4-3",
            Formation::F352 => "3-5-2",
            Formation::F433 => "4-3-3",
            Formation::F442 => "4-4-2",
            Formation::F451 => "4-5-1",
            Formation::F532 => "5-3-2",
            Formation::F541 => "5-4-1",
        }
    }
}

impl Default for Formation {
    fn default() -> Self {
        Formation::F433
    }
}

impl std::fmt::Display for Formation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Formation {
    type Err = SquadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formation::ALL
            .iter()
            .copied()
            .find(|f| f.code() == s)
            .ok_or_else(|| SquadError::InvalidFormation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_formations_field_eleven_starters() {
        for formation in Formation::ALL {
            let (def, mid, fwd) = formation.positions();
            assert_eq!(
                1 + def as usize + mid as usize + fwd as usize,
                11,
                "{} must total 11 starters",
                formation
            );
        }
    }

    #[test]
    fn test_gk_ceiling_is_always_one() {
        for formation in Formation::ALL {
            assert_eq!(formation.starter_slots(Position::GK), 1);
        }
    }

    #[test]
    fn test_code_round_trip() {
        for formation in Formation::ALL {
            let parsed: Formation = formation.code().parse().unwrap();
            assert_eq!(parsed, formation);
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = "4-6-0".parse::<Formation>().unwrap_err();
        assert!(matches!(err, SquadError::InvalidFormation(_)));
    }

    #[test]
    fn test_serde_uses_code_string() {
        let json = serde_json::to_string(&Formation::F352).unwrap();
        assert_eq!(json, "\"3-5-2\"");
        let back: Formation = serde_json::from_str("\"5-4-1\"").unwrap();
        assert_eq!(back, Formation::F541);
    }
}
