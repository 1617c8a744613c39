//! Transfer session manager: layers transfer-window semantics atop the
//! roster store.
//!
//! The session tracks two generations of squad state: the `working` roster
//! every mutation applies to, and the `confirmed` roster captured when the
//! squad first reaches full size and refreshed on every confirm. Cancelling
//! a session discards the working generation. Squad-composition dirtiness
//! (pending transfers) and lineup dirtiness (captaincy, starter/bench,
//! formation) are tracked as two independent flags updated at mutation time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SquadError};
use crate::models::formation::Formation;
use crate::models::player::Player;
use crate::rules::{self, validator};
use crate::squad::autopick;
use crate::squad::roster::Roster;

/// The saved lineup combination used to detect unsaved lineup changes
/// independently of transfer-session dirtiness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineupSnapshot {
    pub starter_ids: BTreeSet<String>,
    pub captain_id: Option<String>,
    pub vice_captain_id: Option<String>,
    pub formation: Option<Formation>,
}

impl LineupSnapshot {
    pub fn of(roster: &Roster) -> Self {
        Self {
            starter_ids: roster
                .players()
                .iter()
                .filter(|p| p.is_starter)
                .map(|p| p.id().to_string())
                .collect(),
            captain_id: roster.captain().map(|p| p.id().to_string()),
            vice_captain_id: roster.vice_captain().map(|p| p.id().to_string()),
            formation: Some(roster.formation()),
        }
    }
}

/// A cancellable transfer session over one user's squad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSession {
    working: Roster,
    confirmed: Roster,
    changes_count: u32,
    free_transfers: u32,
    initial_squad_complete: bool,
    squad_dirty: bool,
    lineup_dirty: bool,
    saved_lineup: LineupSnapshot,
}

impl Default for TransferSession {
    fn default() -> Self {
        Self::new(Formation::default())
    }
}

impl TransferSession {
    pub fn new(formation: Formation) -> Self {
        Self {
            working: Roster::new(formation),
            confirmed: Roster::new(formation),
            changes_count: 0,
            free_transfers: rules::FREE_TRANSFERS,
            initial_squad_complete: false,
            squad_dirty: false,
            lineup_dirty: false,
            saved_lineup: LineupSnapshot::default(),
        }
    }

    // ========================
    // Read accessors
    // ========================

    pub fn roster(&self) -> &Roster {
        &self.working
    }

    pub fn confirmed_roster(&self) -> &Roster {
        &self.confirmed
    }

    pub fn changes_count(&self) -> u32 {
        self.changes_count
    }

    pub fn free_transfers(&self) -> u32 {
        self.free_transfers
    }

    pub fn initial_squad_complete(&self) -> bool {
        self.initial_squad_complete
    }

    pub fn squad_dirty(&self) -> bool {
        self.squad_dirty
    }

    pub fn lineup_dirty(&self) -> bool {
        self.lineup_dirty
    }

    /// Point cost of the pending changes beyond the free allowance.
    /// Always derived, never stored.
    pub fn transfer_cost(&self) -> u32 {
        self.changes_count.saturating_sub(self.free_transfers) * rules::TRANSFER_PENALTY
    }

    // ========================
    // Squad composition
    // ========================

    /// Add a candidate to the working squad. Free while the initial squad is
    /// being built; afterwards, introducing a player not in the confirmed
    /// squad counts as a pending transfer.
    pub fn add_player(&mut self, candidate: Player) -> Result<()> {
        let candidate_id = candidate.id.clone();
        self.working.add_player(candidate)?;

        if self.initial_squad_complete {
            if !self.confirmed.contains(&candidate_id) {
                self.changes_count += 1;
            }
            self.squad_dirty = true;
        } else {
            self.capture_if_complete();
        }
        Ok(())
    }

    /// Remove a player from the working squad. Removing a player that was
    /// never confirmed undoes a pending change for free.
    pub fn remove_player(&mut self, player_id: &str) -> Result<()> {
        let removed = self
            .working
            .remove_player(player_id)
            .ok_or_else(|| SquadError::PlayerNotFound(player_id.to_string()))?;

        if self.initial_squad_complete {
            if !self.confirmed.contains(removed.id()) {
                self.changes_count = self.changes_count.saturating_sub(1);
            }
            self.squad_dirty = true;
        }
        Ok(())
    }

    /// Replace one squad member with a catalog player in a single operation.
    /// The incoming player inherits the outgoing player's lineup state.
    ///
    /// Change accounting is asymmetric by design: only a confirmed player
    /// leaving for a new one costs a transfer; the reverse refunds one, and
    /// confirmed-for-confirmed or pending-for-pending swaps cost nothing.
    pub fn transfer_player(&mut self, out_id: &str, incoming: Player) -> Result<()> {
        let out_player = self
            .working
            .get(out_id)
            .ok_or_else(|| SquadError::PlayerNotFound(out_id.to_string()))?
            .clone();
        validator::can_transfer(&self.working, &out_player, &incoming).into_result()?;
        if self.working.contains(&incoming.id) {
            return Err(SquadError::RuleViolation("Player already in squad".to_string()));
        }

        let out_confirmed = self.confirmed.contains(out_id);
        let in_confirmed = self.confirmed.contains(&incoming.id);

        // In-place replacement: the incoming player takes over the vacated
        // lineup slot exactly (starter flag, captaincy, bench order).
        let incoming_id = incoming.id.clone();
        self.working.replace_player(out_id, incoming)?;

        if self.initial_squad_complete {
            if out_confirmed && !in_confirmed {
                self.changes_count += 1;
            } else if !out_confirmed && in_confirmed {
                self.changes_count = self.changes_count.saturating_sub(1);
            }
            self.squad_dirty = true;
        } else {
            self.capture_if_complete();
        }

        debug!(out = %out_id, incoming = %incoming_id, changes = self.changes_count, "transfer applied");
        Ok(())
    }

    /// Complete an auto-pick pass over `pool` (see [`autopick`]). Never
    /// fails; callers check the resulting squad size. Reaching full size
    /// triggers the same first-completion capture as a manual 15th addition.
    pub fn auto_pick(&mut self, pool: &[Player]) {
        let picked = autopick::auto_pick(&mut self.working, pool);

        if self.initial_squad_complete {
            for id in &picked {
                if !self.confirmed.contains(id) {
                    self.changes_count += 1;
                }
            }
            if !picked.is_empty() {
                self.squad_dirty = true;
            }
        } else {
            self.capture_if_complete();
        }
        debug!(
            picked = picked.len(),
            squad = self.working.len(),
            "auto-pick finished"
        );
    }

    // ========================
    // Lineup
    // ========================

    pub fn set_starter(&mut self, player_id: &str, make_starter: bool) -> Result<()> {
        self.working.set_starter(player_id, make_starter)?;
        self.lineup_dirty = true;
        Ok(())
    }

    pub fn swap_players(&mut self, starter_id: &str, bench_id: &str) -> Result<()> {
        self.working.swap_players(starter_id, bench_id)?;
        self.lineup_dirty = true;
        Ok(())
    }

    pub fn set_captain(&mut self, player_id: &str) -> Result<()> {
        self.working.set_captain(player_id)?;
        self.lineup_dirty = true;
        Ok(())
    }

    pub fn set_vice_captain(&mut self, player_id: &str) -> Result<()> {
        self.working.set_vice_captain(player_id)?;
        self.lineup_dirty = true;
        Ok(())
    }

    pub fn set_formation(&mut self, formation: Formation) {
        self.working.set_formation(formation);
        self.lineup_dirty = true;
    }

    /// Record the current lineup as saved.
    pub fn save_lineup(&mut self) {
        self.saved_lineup = LineupSnapshot::of(&self.working);
        self.lineup_dirty = false;
    }

    pub fn saved_lineup(&self) -> &LineupSnapshot {
        &self.saved_lineup
    }

    // ========================
    // Session transitions
    // ========================

    /// Commit the working squad: refresh the confirmed generation, spend
    /// free transfers (floored at zero, no banking) and reset the change
    /// counter.
    pub fn confirm_transfers(&mut self) {
        if self.working.len() == rules::MAX_SQUAD_SIZE && !self.initial_squad_complete {
            self.initial_squad_complete = true;
        }
        let confirmed_changes = self.changes_count;
        self.confirmed = self.working.clone();
        self.free_transfers = self.free_transfers.saturating_sub(confirmed_changes);
        self.changes_count = 0;
        self.squad_dirty = false;
        debug!(confirmed_changes, free_transfers = self.free_transfers, "transfers confirmed");
    }

    /// Discard pending changes, reverting the working squad to the confirmed
    /// generation. Idempotent.
    pub fn cancel_transfers(&mut self) {
        self.working = self.confirmed.clone();
        self.changes_count = 0;
        self.squad_dirty = false;
        // The revert may also roll back lineup state; one snapshot compare at
        // this explicit boundary keeps the flag truthful.
        self.lineup_dirty = LineupSnapshot::of(&self.working) != self.saved_lineup;
        debug!("transfers cancelled");
    }

    /// Full teardown: both generations emptied, allowance restored, the
    /// one-way completion flag cleared.
    pub fn reset_squad(&mut self) {
        let formation = Formation::default();
        self.working = Roster::new(formation);
        self.confirmed = Roster::new(formation);
        self.changes_count = 0;
        self.free_transfers = rules::FREE_TRANSFERS;
        self.initial_squad_complete = false;
        self.squad_dirty = false;
        self.lineup_dirty = false;
        self.saved_lineup = LineupSnapshot::default();
        debug!("squad reset");
    }

    // ========================
    // Internal
    // ========================

    /// One-way transition: the first time the squad reaches full size, the
    /// confirmed generation is captured and building ends.
    fn capture_if_complete(&mut self) {
        if !self.initial_squad_complete && self.working.len() == rules::MAX_SQUAD_SIZE {
            self.initial_squad_complete = true;
            self.confirmed = self.working.clone();
            self.changes_count = 0;
            self.squad_dirty = false;
            debug!("initial squad complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{LeagueCode, Position};

    fn player(id: &str, team: &str, position: Position, price: f32) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            team: team.to_string(),
            league: league_for(id),
            position,
            price,
            points: 50.0,
        }
    }

    // Spread ids across leagues so transfer league guards stay out of the way.
    fn league_for(id: &str) -> LeagueCode {
        let n = id.bytes().map(|b| b as usize).sum::<usize>();
        LeagueCode::ALL[n % LeagueCode::ALL.len()]
    }

    fn complete_session() -> TransferSession {
        let mut session = TransferSession::new(Formation::F433);
        let specs: [(Position, usize); 4] = [
            (Position::GK, 2),
            (Position::DEF, 5),
            (Position::MID, 5),
            (Position::FWD, 3),
        ];
        let mut n = 0;
        for (position, count) in specs {
            for i in 0..count {
                n += 1;
                let id = format!("{}{}", position.as_str().to_lowercase(), i + 1);
                session.add_player(player(&id, &format!("Club {n}"), position, 5.0)).unwrap();
            }
        }
        assert!(session.initial_squad_complete());
        session
    }

    #[test]
    fn test_building_the_first_squad_is_free() {
        let mut session = TransferSession::new(Formation::F433);
        session.add_player(player("m1", "A", Position::MID, 8.0)).unwrap();
        session.add_player(player("m2", "B", Position::MID, 8.0)).unwrap();
        session.remove_player("m1").unwrap();
        assert_eq!(session.changes_count(), 0);
        assert!(!session.initial_squad_complete());
        assert_eq!(session.transfer_cost(), 0);
    }

    #[test]
    fn test_fifteenth_add_captures_confirmed_generation() {
        let session = complete_session();
        assert!(session.initial_squad_complete());
        assert_eq!(session.confirmed_roster().len(), 15);
        assert_eq!(session.changes_count(), 0);
        assert!(!session.squad_dirty());
    }

    #[test]
    fn test_pending_change_accounting_and_refund() {
        let mut session = complete_session();

        // Swap out a confirmed midfielder for a new one: one pending change.
        session.remove_player("mid1").unwrap();
        assert_eq!(session.changes_count(), 0); // removal alone costs nothing
        session.add_player(player("mid9", "New Club", Position::MID, 5.0)).unwrap();
        assert_eq!(session.changes_count(), 1);
        assert!(session.squad_dirty());

        // Undo the pending add for free, then restore the confirmed player.
        session.remove_player("mid9").unwrap();
        assert_eq!(session.changes_count(), 0);
        session.add_player(player("mid1", "Club 8", Position::MID, 5.0)).unwrap();
        assert_eq!(session.changes_count(), 0);
    }

    #[test]
    fn test_transfer_counts_only_confirmed_to_new() {
        let mut session = complete_session();

        let out_league = session.roster().get("fwd1").unwrap().league();
        session
            .transfer_player("fwd1", player_in_league("fwd9", out_league, Position::FWD))
            .unwrap();
        assert_eq!(session.changes_count(), 1);

        // Pending-for-pending: replace the just-added player again, no extra cost.
        session
            .transfer_player("fwd9", player_in_league("fwd10", out_league, Position::FWD))
            .unwrap();
        assert_eq!(session.changes_count(), 1);

        // New-for-confirmed (bringing fwd1 back) refunds the pending change.
        session
            .transfer_player("fwd10", player_in_league_with_team("fwd1", out_league, "Club 13"))
            .unwrap();
        assert_eq!(session.changes_count(), 0);
    }

    fn player_in_league(id: &str, league: LeagueCode, position: Position) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            team: format!("Fresh Club {id}"),
            league,
            position,
            price: 5.0,
            points: 60.0,
        }
    }

    fn player_in_league_with_team(id: &str, league: LeagueCode, team: &str) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            team: team.to_string(),
            league,
            position: Position::FWD,
            price: 5.0,
            points: 60.0,
        }
    }

    #[test]
    fn test_transfer_preserves_lineup_slot() {
        let mut session = complete_session();
        session.set_captain("fwd1").unwrap();
        let out = session.roster().get("fwd1").unwrap().clone();
        assert!(out.is_starter);

        session
            .transfer_player("fwd1", player_in_league("fwd9", out.league(), Position::FWD))
            .unwrap();
        let incoming = session.roster().get("fwd9").unwrap();
        assert!(incoming.is_starter);
        assert!(incoming.is_captain);
        assert_eq!(session.roster().len(), 15);
    }

    #[test]
    fn test_transfer_cost_scenario() {
        // Confirmed 15, 1 free transfer, 3 net substitutions -> (3-1)*4 = 8.
        let mut session = complete_session();
        assert_eq!(session.free_transfers(), 1);

        for (out_id, in_id) in [("mid1", "n1"), ("mid2", "n2"), ("mid3", "n3")] {
            let league = session.roster().get(out_id).unwrap().league();
            session.transfer_player(out_id, player_in_league(in_id, league, Position::MID)).unwrap();
        }
        assert_eq!(session.changes_count(), 3);
        assert_eq!(session.transfer_cost(), 8);

        session.confirm_transfers();
        assert_eq!(session.free_transfers(), 0);
        assert_eq!(session.changes_count(), 0);
        assert_eq!(session.transfer_cost(), 0);
        assert!(session.confirmed_roster().contains("n1"));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut session = complete_session();
        let league = session.roster().get("def1").unwrap().league();
        session.transfer_player("def1", player_in_league("d9", league, Position::DEF)).unwrap();
        assert!(session.squad_dirty());

        session.cancel_transfers();
        let after_first = session.roster().clone();
        assert!(after_first.contains("def1"));
        assert!(!after_first.contains("d9"));
        assert_eq!(session.changes_count(), 0);

        session.cancel_transfers();
        assert_eq!(*session.roster(), after_first);
        assert!(!session.squad_dirty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = complete_session();
        session.set_captain("mid1").unwrap();
        session.reset_squad();

        assert!(session.roster().is_empty());
        assert!(session.confirmed_roster().is_empty());
        assert!(!session.initial_squad_complete());
        assert_eq!(session.free_transfers(), rules::FREE_TRANSFERS);
        assert_eq!(session.changes_count(), 0);
        assert!(!session.squad_dirty());
        assert!(!session.lineup_dirty());
    }

    #[test]
    fn test_lineup_dirty_is_independent_of_squad_dirty() {
        let mut session = complete_session();
        session.save_lineup();
        assert!(!session.lineup_dirty());

        session.set_captain("mid1").unwrap();
        assert!(session.lineup_dirty());
        assert!(!session.squad_dirty());

        session.save_lineup();
        assert!(!session.lineup_dirty());

        session.set_formation(Formation::F352);
        assert!(session.lineup_dirty());
    }

    #[test]
    fn test_cancel_recomputes_lineup_dirty() {
        let mut session = complete_session();
        session.save_lineup();

        // A transfer of a starter changes the starter set; cancel restores it.
        let league = session.roster().get("fwd1").unwrap().league();
        session.transfer_player("fwd1", player_in_league("f9", league, Position::FWD)).unwrap();
        session.cancel_transfers();
        assert!(!session.lineup_dirty());
    }
}
