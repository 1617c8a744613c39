//! Pure, side-effect-free predicates deciding whether a prospective mutation
//! keeps the roster legal.
//!
//! Verdicts are values, never errors: rule violations are routine outcomes of
//! normal interactive use. Checks run in a fixed priority order and the first
//! failing check's reason is returned.

use serde::Serialize;

use crate::error::SquadError;
use crate::models::player::{Player, SquadPlayer};
use crate::rules::{MAX_FROM_SAME_CLUB, MAX_SQUAD_SIZE, MAX_STARTERS};
use crate::squad::roster::Roster;

/// Outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCheck {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RuleCheck {
    pub fn allow() -> Self {
        Self { allowed: true, reason: None }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self { allowed: false, reason: Some(reason.into()) }
    }

    /// Convert to a `Result` for use inside mutators.
    pub fn into_result(self) -> Result<(), SquadError> {
        if self.allowed {
            Ok(())
        } else {
            Err(SquadError::RuleViolation(
                self.reason.unwrap_or_else(|| "Not allowed".to_string()),
            ))
        }
    }
}

/// Can `candidate` join the roster?
///
/// Priority order: squad size, budget, position quota, duplicate id, club cap.
pub fn can_add_player(roster: &Roster, candidate: &Player) -> RuleCheck {
    if roster.len() >= MAX_SQUAD_SIZE {
        return RuleCheck::deny(format!("Squad is full ({MAX_SQUAD_SIZE} players)"));
    }

    let remaining = roster.budget_remaining();
    if candidate.price > remaining {
        return RuleCheck::deny(format!("Not enough budget (€{remaining:.1}M remaining)"));
    }

    let quota = candidate.position.quota();
    if roster.position_count(candidate.position) >= quota {
        return RuleCheck::deny(format!("Already have max {} {}s", quota, candidate.position));
    }

    if roster.contains(&candidate.id) {
        return RuleCheck::deny("Player already in squad");
    }

    if roster.club_count(&candidate.team) >= MAX_FROM_SAME_CLUB {
        return RuleCheck::deny(format!(
            "Max {} players from {}",
            MAX_FROM_SAME_CLUB, candidate.team
        ));
    }

    RuleCheck::allow()
}

/// Can `player` be promoted to (or demoted from) the starting XI?
pub fn can_set_starter(roster: &Roster, player: &SquadPlayer, make_starter: bool) -> RuleCheck {
    if make_starter {
        if player.is_starter {
            return RuleCheck::allow(); // already a starter, nothing to check
        }

        if roster.starter_count() >= MAX_STARTERS {
            return RuleCheck::deny(format!("Already have {MAX_STARTERS} starters"));
        }

        let formation = roster.formation();
        let ceiling = formation.starter_slots(player.position());
        if roster.position_starter_count(player.position()) >= ceiling {
            return RuleCheck::deny(format!(
                "Formation {} allows max {} {}s in starting XI",
                formation,
                ceiling,
                player.position()
            ));
        }
    } else if player.is_starter && roster.bench_count() >= crate::rules::MAX_BENCH {
        // Demoting with a full bench would overflow the 4-man bench; the
        // like-for-like swap operation exists for that case.
        return RuleCheck::deny(format!("Bench is full ({} players)", crate::rules::MAX_BENCH));
    }

    RuleCheck::allow()
}

/// Can `out_player` be replaced by `incoming` in one transfer?
///
/// A transfer must preserve position, stay within budget after crediting the
/// outgoing price back, respect the club cap (not counting the outgoing
/// player), and keep every league represented.
pub fn can_transfer(roster: &Roster, out_player: &SquadPlayer, incoming: &Player) -> RuleCheck {
    if out_player.position() != incoming.position {
        let pos = out_player.position();
        return RuleCheck::deny(format!("Must replace {pos} with another {pos}"));
    }

    let new_budget = roster.budget_remaining() + out_player.price();
    if incoming.price > new_budget {
        return RuleCheck::deny(format!(
            "Not enough budget after transfer (€{new_budget:.1}M available)"
        ));
    }

    let club_count = roster
        .players()
        .iter()
        .filter(|p| p.player.team == incoming.team && p.id() != out_player.id())
        .count();
    if club_count >= MAX_FROM_SAME_CLUB {
        return RuleCheck::deny(format!(
            "Max {} players from {}",
            MAX_FROM_SAME_CLUB, incoming.team
        ));
    }

    // Keep every league represented: if the outgoing player is the last from
    // their league, the incoming player must be from that league.
    let out_league_rest = roster
        .players()
        .iter()
        .filter(|p| p.league() == out_player.league() && p.id() != out_player.id())
        .count();
    if out_league_rest == 0 && incoming.league != out_player.league() {
        return RuleCheck::deny(format!(
            "Must maintain at least 1 player from {}",
            out_player.league()
        ));
    }

    RuleCheck::allow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{LeagueCode, Position};
    use crate::models::Formation;

    fn player(id: &str, team: &str, league: LeagueCode, position: Position, price: f32) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            team: team.to_string(),
            league,
            position,
            price,
            points: 50.0,
        }
    }

    fn roster_with(players: Vec<Player>) -> Roster {
        let mut roster = Roster::new(Formation::F433);
        for p in players {
            roster.add_player(p).unwrap();
        }
        roster
    }

    #[test]
    fn test_third_gk_is_rejected_with_quota_reason() {
        let roster = roster_with(vec![
            player("g1", "A", LeagueCode::PL, Position::GK, 5.0),
            player("g2", "B", LeagueCode::LL, Position::GK, 5.0),
        ]);
        let check =
            can_add_player(&roster, &player("g3", "C", LeagueCode::SA, Position::GK, 5.0));
        assert!(!check.allowed);
        assert_eq!(check.reason.as_deref(), Some("Already have max 2 GKs"));
    }

    #[test]
    fn test_budget_rejection_leaves_budget_untouched() {
        // Spend 97.0 of the 100.0 budget, then try a 5.0 player.
        let roster = roster_with(vec![
            player("d1", "A", LeagueCode::PL, Position::DEF, 40.0),
            player("d2", "B", LeagueCode::LL, Position::DEF, 40.0),
            player("d3", "C", LeagueCode::SA, Position::DEF, 17.0),
        ]);
        assert_eq!(roster.budget_remaining(), 3.0);

        let check =
            can_add_player(&roster, &player("m1", "D", LeagueCode::BL, Position::MID, 5.0));
        assert!(!check.allowed);
        assert_eq!(check.reason.as_deref(), Some("Not enough budget (€3.0M remaining)"));
        assert_eq!(roster.budget_remaining(), 3.0);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let roster = roster_with(vec![player("x", "A", LeagueCode::PL, Position::MID, 8.0)]);
        let check = can_add_player(&roster, &player("x", "B", LeagueCode::LL, Position::MID, 7.0));
        assert_eq!(check.reason.as_deref(), Some("Player already in squad"));
    }

    #[test]
    fn test_club_cap_is_rejected() {
        let roster = roster_with(vec![
            player("1", "Real Madrid", LeagueCode::LL, Position::DEF, 6.0),
            player("2", "Real Madrid", LeagueCode::LL, Position::MID, 9.0),
            player("3", "Real Madrid", LeagueCode::LL, Position::FWD, 12.0),
        ]);
        let check = can_add_player(
            &roster,
            &player("4", "Real Madrid", LeagueCode::LL, Position::GK, 5.0),
        );
        assert_eq!(check.reason.as_deref(), Some("Max 3 players from Real Madrid"));
    }

    #[test]
    fn test_transfer_must_preserve_position() {
        let roster = roster_with(vec![player("f1", "A", LeagueCode::PL, Position::FWD, 10.0)]);
        let out = roster.get("f1").unwrap().clone();
        let check =
            can_transfer(&roster, &out, &player("m1", "B", LeagueCode::PL, Position::MID, 8.0));
        assert_eq!(check.reason.as_deref(), Some("Must replace FWD with another FWD"));
    }

    #[test]
    fn test_transfer_budget_credits_outgoing_price() {
        let roster = roster_with(vec![
            player("d1", "A", LeagueCode::PL, Position::DEF, 50.0),
            player("d2", "B", LeagueCode::LL, Position::DEF, 45.0),
        ]);
        // 5.0 remaining; selling d2 frees 45.0, so a 50.0 defender fits.
        let out = roster.get("d2").unwrap().clone();
        let incoming = player("d3", "C", LeagueCode::LL, Position::DEF, 50.0);
        assert!(can_transfer(&roster, &out, &incoming).allowed);

        let too_dear = player("d4", "C", LeagueCode::LL, Position::DEF, 50.5);
        let check = can_transfer(&roster, &out, &too_dear);
        assert_eq!(
            check.reason.as_deref(),
            Some("Not enough budget after transfer (€50.0M available)")
        );
    }

    #[test]
    fn test_transfer_club_cap_excludes_outgoing_player() {
        let roster = roster_with(vec![
            player("1", "Inter Milan", LeagueCode::SA, Position::DEF, 6.0),
            player("2", "Inter Milan", LeagueCode::SA, Position::MID, 8.0),
            player("3", "Inter Milan", LeagueCode::SA, Position::FWD, 11.0),
        ]);
        // Replacing an Inter player with another Inter player keeps the count at 3.
        let out = roster.get("3").unwrap().clone();
        let incoming = player("4", "Inter Milan", LeagueCode::SA, Position::FWD, 10.0);
        assert!(can_transfer(&roster, &out, &incoming).allowed);
    }

    #[test]
    fn test_transfer_keeps_league_represented() {
        let roster = roster_with(vec![
            player("1", "PSG", LeagueCode::FL1, Position::FWD, 9.5),
            player("2", "Arsenal", LeagueCode::PL, Position::FWD, 10.0),
        ]);
        let out = roster.get("1").unwrap().clone();
        let incoming = player("3", "Liverpool", LeagueCode::PL, Position::FWD, 9.0);
        let check = can_transfer(&roster, &out, &incoming);
        assert_eq!(check.reason.as_deref(), Some("Must maintain at least 1 player from FL1"));

        // Same-league replacement is fine.
        let incoming_fl1 = player("4", "Monaco", LeagueCode::FL1, Position::FWD, 9.0);
        assert!(can_transfer(&roster, &out, &incoming_fl1).allowed);
    }
}
