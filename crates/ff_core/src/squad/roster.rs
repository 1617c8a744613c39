//! Roster store: the canonical list of owned players plus per-player derived
//! state (starter, captaincy, bench order), mutated only through validated
//! operations.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SquadError};
use crate::models::formation::Formation;
use crate::models::player::{LeagueCode, Player, Position, SquadPlayer};
use crate::rules::{self, validator};

/// An ordered collection of at most 15 squad players, unique by id, plus the
/// active formation governing the starting XI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<SquadPlayer>,
    formation: Formation,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(Formation::default())
    }
}

impl Roster {
    pub fn new(formation: Formation) -> Self {
        Self { players: Vec::new(), formation }
    }

    // ========================
    // Read accessors
    // ========================

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= rules::MAX_SQUAD_SIZE
    }

    pub fn players(&self) -> &[SquadPlayer] {
        &self.players
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id() == player_id)
    }

    pub fn get(&self, player_id: &str) -> Option<&SquadPlayer> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    fn get_mut(&mut self, player_id: &str) -> Option<&mut SquadPlayer> {
        self.players.iter_mut().find(|p| p.id() == player_id)
    }

    pub fn total_price(&self) -> f32 {
        self.players.iter().map(|p| p.price()).sum()
    }

    pub fn budget_remaining(&self) -> f32 {
        rules::BUDGET - self.total_price()
    }

    pub fn position_count(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.position() == position).count()
    }

    pub fn league_count(&self, league: LeagueCode) -> usize {
        self.players.iter().filter(|p| p.league() == league).count()
    }

    pub fn club_count(&self, team: &str) -> usize {
        self.players.iter().filter(|p| p.player.team == team).count()
    }

    pub fn starter_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_starter).count()
    }

    pub fn position_starter_count(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.is_starter && p.position() == position).count()
    }

    pub fn bench_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_starter).count()
    }

    pub fn captain(&self) -> Option<&SquadPlayer> {
        self.players.iter().find(|p| p.is_captain)
    }

    pub fn vice_captain(&self) -> Option<&SquadPlayer> {
        self.players.iter().find(|p| p.is_vice_captain)
    }

    /// "D-M-F" code derived from the current starters (may differ from the
    /// active formation while the XI is incomplete).
    pub fn derived_formation_code(&self) -> String {
        format!(
            "{}-{}-{}",
            self.position_starter_count(Position::DEF),
            self.position_starter_count(Position::MID),
            self.position_starter_count(Position::FWD)
        )
    }

    /// True when every league code has at least one squad member.
    pub fn all_leagues_covered(&self) -> bool {
        LeagueCode::ALL.iter().all(|&l| self.league_count(l) >= 1)
    }

    // ========================
    // Mutations
    // ========================

    /// Add a candidate to the squad.
    ///
    /// A newly added player starts if their position still has an open
    /// formation slot among current starters; otherwise they go to the bench.
    /// With the XI full and the bench at capacity the add fails outright.
    pub fn add_player(&mut self, candidate: Player) -> Result<()> {
        validator::can_add_player(self, &candidate).into_result()?;

        let starts = self.starter_count() < rules::MAX_STARTERS
            && self.position_starter_count(candidate.position)
                < self.formation.starter_slots(candidate.position);

        let mut member = SquadPlayer::from(candidate);
        if starts {
            member.is_starter = true;
        } else {
            if self.bench_count() >= rules::MAX_BENCH {
                return Err(SquadError::RuleViolation(format!(
                    "Bench is full ({} players)",
                    rules::MAX_BENCH
                )));
            }
            member.bench_order = Some(self.bench_count() as u8 + 1);
        }

        self.players.push(member);
        Ok(())
    }

    /// Remove a player unconditionally. A removed captain or vice-captain
    /// simply loses the designation; there is no auto-reassignment.
    pub fn remove_player(&mut self, player_id: &str) -> Option<SquadPlayer> {
        let idx = self.players.iter().position(|p| p.id() == player_id)?;
        let removed = self.players.remove(idx);
        self.compact_bench_orders();
        Some(removed)
    }

    /// Promote a player to the starting XI or demote them to the bench.
    pub fn set_starter(&mut self, player_id: &str, make_starter: bool) -> Result<()> {
        let player = self
            .get(player_id)
            .ok_or_else(|| SquadError::PlayerNotFound(player_id.to_string()))?;
        validator::can_set_starter(self, player, make_starter).into_result()?;

        let next_order = self.bench_count() as u8 + 1;
        let player = self.get_mut(player_id).expect("checked above");
        if make_starter {
            player.is_starter = true;
            player.bench_order = None;
            self.compact_bench_orders();
        } else if player.is_starter {
            player.is_starter = false;
            player.bench_order = Some(next_order);
        }
        Ok(())
    }

    /// Atomically exchange a starter with a bench player of the same
    /// position. The starter inherits the bench player's substitute priority.
    pub fn swap_players(&mut self, starter_id: &str, bench_id: &str) -> Result<()> {
        let starter = self
            .get(starter_id)
            .ok_or_else(|| SquadError::PlayerNotFound(starter_id.to_string()))?;
        let bench = self
            .get(bench_id)
            .ok_or_else(|| SquadError::PlayerNotFound(bench_id.to_string()))?;

        if !starter.is_starter {
            return Err(SquadError::NotAStarter(starter_id.to_string()));
        }
        if bench.is_starter {
            return Err(SquadError::NotOnBench(bench_id.to_string()));
        }
        // Same position keeps the swap within the formation's ceilings.
        if starter.position() != bench.position() {
            return Err(SquadError::RuleViolation(format!(
                "Cannot swap a {} with a {}",
                starter.position(),
                bench.position()
            )));
        }

        let inherited_order = bench.bench_order;
        {
            let bench = self.get_mut(bench_id).expect("checked above");
            bench.is_starter = true;
            bench.bench_order = None;
        }
        {
            let starter = self.get_mut(starter_id).expect("checked above");
            starter.is_starter = false;
            starter.bench_order = inherited_order;
        }
        Ok(())
    }

    /// Replace a member with a catalog player in place, preserving the
    /// vacated lineup slot (starter flag, captaincy, bench order). Rule
    /// validation (`validator::can_transfer`) is the caller's responsibility;
    /// same-position replacement keeps every formation ceiling intact.
    pub(crate) fn replace_player(&mut self, out_id: &str, incoming: Player) -> Result<()> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id() == out_id)
            .ok_or_else(|| SquadError::PlayerNotFound(out_id.to_string()))?;
        let old = &self.players[idx];
        self.players[idx] = SquadPlayer {
            player: incoming,
            is_starter: old.is_starter,
            is_captain: old.is_captain,
            is_vice_captain: old.is_vice_captain,
            bench_order: old.bench_order,
        };
        Ok(())
    }

    /// Make a player captain, clearing any previous holder. A captain cannot
    /// also be vice-captain.
    pub fn set_captain(&mut self, player_id: &str) -> Result<()> {
        if !self.contains(player_id) {
            return Err(SquadError::PlayerNotFound(player_id.to_string()));
        }
        for p in &mut self.players {
            let is_target = p.player.id == player_id;
            p.is_captain = is_target;
            if is_target {
                p.is_vice_captain = false;
            }
        }
        Ok(())
    }

    /// Make a player vice-captain, clearing any previous holder and the
    /// captain flag on the same player.
    pub fn set_vice_captain(&mut self, player_id: &str) -> Result<()> {
        if !self.contains(player_id) {
            return Err(SquadError::PlayerNotFound(player_id.to_string()));
        }
        for p in &mut self.players {
            let is_target = p.player.id == player_id;
            p.is_vice_captain = is_target;
            if is_target {
                p.is_captain = false;
            }
        }
        Ok(())
    }

    /// Switch formation and re-partition starters/bench to the new
    /// per-position ceilings. Squad composition never changes; players
    /// already starting are preferred, and open slots are filled from the
    /// bench by substitute priority, then arrival order.
    pub fn set_formation(&mut self, formation: Formation) {
        self.formation = formation;

        // Trim starters above each position's new ceiling (last in, first out).
        for position in Position::ALL {
            let ceiling = formation.starter_slots(position);
            let mut kept = 0usize;
            for p in &mut self.players {
                if p.is_starter && p.player.position == position {
                    if kept < ceiling {
                        kept += 1;
                    } else {
                        p.is_starter = false;
                        p.bench_order = None; // ranked after existing bench below
                    }
                }
            }
        }

        // Fill open slots from the bench, best substitute priority first.
        for position in Position::ALL {
            let ceiling = formation.starter_slots(position);
            while self.position_starter_count(position) < ceiling
                && self.starter_count() < rules::MAX_STARTERS
            {
                let candidate = self
                    .players
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.is_starter && p.player.position == position)
                    .min_by_key(|(idx, p)| (p.bench_order.is_none(), p.bench_order, *idx))
                    .map(|(idx, _)| idx);
                match candidate {
                    Some(idx) => {
                        self.players[idx].is_starter = true;
                        self.players[idx].bench_order = None;
                    }
                    None => break, // no eligible bench player; XI stays short
                }
            }
        }

        self.compact_bench_orders();
    }

    /// Reassign bench orders densely (1..=n), keeping existing priorities and
    /// ranking players without one (freshly demoted) last, in arrival order.
    fn compact_bench_orders(&mut self) {
        let mut bench: Vec<usize> = (0..self.players.len())
            .filter(|&i| !self.players[i].is_starter)
            .collect();
        bench.sort_by_key(|&i| {
            (self.players[i].bench_order.is_none(), self.players[i].bench_order, i)
        });
        for (rank, idx) in bench.into_iter().enumerate() {
            self.players[idx].bench_order = Some(rank as u8 + 1);
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.len() <= rules::MAX_SQUAD_SIZE);
        assert!(self.total_price() <= rules::BUDGET + 1e-3);
        for position in Position::ALL {
            assert!(self.position_count(position) <= position.quota());
            assert!(
                self.position_starter_count(position) <= self.formation.starter_slots(position)
            );
        }
        assert!(self.starter_count() <= rules::MAX_STARTERS);
        assert!(self.players.iter().filter(|p| p.is_captain).count() <= 1);
        assert!(self.players.iter().filter(|p| p.is_vice_captain).count() <= 1);
        assert!(!self.players.iter().any(|p| p.is_captain && p.is_vice_captain));
        for p in &self.players {
            assert_eq!(p.bench_order.is_some(), !p.is_starter, "bench order iff benched");
        }
        let mut orders: Vec<u8> = self.players.iter().filter_map(|p| p.bench_order).collect();
        orders.sort_unstable();
        let expected: Vec<u8> = (1..=orders.len() as u8).collect();
        assert_eq!(orders, expected, "bench orders must be dense");
    }
}
