//! Auto-pick planner: completes a partial roster to full size with a
//! deterministic two-pass greedy strategy over a value-ranked candidate pool.
//!
//! Pass 1 covers leagues missing from the roster; pass 2 fills the remaining
//! position quotas. Affordability is reservation-aware: before each pick the
//! planner reserves the cheapest distinct candidates still available for
//! every unfilled slot, so an expensive pick can never strand the plan
//! without funds for the mandatory slots left. The planner never fails;
//! slots with no eligible candidate are left unfilled and callers check the
//! squad size.

use std::cmp::Ordering;

use tracing::trace;

use crate::models::player::{LeagueCode, Player, Position};
use crate::rules::MAX_FROM_SAME_CLUB;
use crate::squad::roster::Roster;

/// Fixed position priority for both planning passes.
const PICK_ORDER: [Position; 4] = [Position::FWD, Position::MID, Position::DEF, Position::GK];

const PRICE_EPSILON: f32 = 1e-4;

/// Complete `roster` from `pool` as far as the rules allow. Returns the ids
/// of the players added, in pick order.
pub fn auto_pick(roster: &mut Roster, pool: &[Player]) -> Vec<String> {
    let mut ranked: Vec<&Player> = pool.iter().collect();
    ranked.sort_by(|a, b| rank(a, b));

    let mut picked: Vec<String> = Vec::new();

    // Pass 1: one player for every league not yet represented.
    for league in LeagueCode::ALL {
        if roster.league_count(league) > 0 {
            continue;
        }
        'league: for position in PICK_ORDER {
            if roster.position_count(position) >= position.quota() {
                continue;
            }
            for candidate in
                ranked.iter().filter(|c| c.league == league && c.position == position)
            {
                if is_eligible(roster, &ranked, candidate)
                    && roster.add_player((*candidate).clone()).is_ok()
                {
                    trace!(id = %candidate.id, league = %league, "league-coverage pick");
                    picked.push(candidate.id.clone());
                    break 'league;
                }
            }
        }
    }

    // Pass 2: fill each position quota with the best remaining candidates.
    for position in PICK_ORDER {
        while roster.position_count(position) < position.quota() {
            let next = ranked
                .iter()
                .filter(|c| c.position == position)
                .find(|c| is_eligible(roster, &ranked, c))
                .map(|c| (*c).clone());
            let Some(candidate) = next else {
                break; // pool exhausted for this slot; leave it unfilled
            };
            let id = candidate.id.clone();
            if roster.add_player(candidate).is_err() {
                break;
            }
            trace!(id = %id, position = %position, "quota-fill pick");
            picked.push(id);
        }
    }

    picked
}

/// Value ranking: points per price descending, then raw points, then id for
/// a stable, deterministic order.
fn rank(a: &Player, b: &Player) -> Ordering {
    b.value()
        .partial_cmp(&a.value())
        .unwrap_or(Ordering::Equal)
        .then(b.points.partial_cmp(&a.points).unwrap_or(Ordering::Equal))
        .then_with(|| a.id.cmp(&b.id))
}

/// Planner-level eligibility: roster rules plus the reservation-aware
/// affordability check.
fn is_eligible(roster: &Roster, pool: &[&Player], candidate: &Player) -> bool {
    if roster.contains(&candidate.id) {
        return false;
    }
    if roster.position_count(candidate.position) >= candidate.position.quota() {
        return false;
    }
    if roster.club_count(&candidate.team) >= MAX_FROM_SAME_CLUB {
        return false;
    }
    candidate.price + reservation_after(roster, pool, candidate)
        <= roster.budget_remaining() + PRICE_EPSILON
}

/// Minimum spend required to fill every position still short after taking
/// `candidate`: the sum of the cheapest distinct available candidates per
/// position, recomputed against the current roster. Each remaining slot needs
/// its own player, so a cheap price can only be counted once.
fn reservation_after(roster: &Roster, pool: &[&Player], candidate: &Player) -> f32 {
    let mut reservation = 0.0;
    for position in Position::ALL {
        let mut needed = position.quota() - roster.position_count(position);
        if position == candidate.position {
            needed -= 1; // the candidate fills one of its own slots
        }
        if needed == 0 {
            continue;
        }
        let mut prices: Vec<f32> = pool
            .iter()
            .filter(|c| {
                c.position == position && c.id != candidate.id && !roster.contains(&c.id)
            })
            .map(|c| c.price)
            .collect();
        prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        // Fewer candidates than slots: reserve what exists, the rest is
        // unfillable regardless of this pick.
        reservation += prices.iter().take(needed).sum::<f32>();
    }
    reservation
}
