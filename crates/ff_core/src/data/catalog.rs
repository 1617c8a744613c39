//! Default player catalog, embedded at compile time and parsed once.

use std::collections::HashMap;
use std::sync::OnceLock;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::models::player::{LeagueCode, Player};

/// Raw catalog JSON (~10KB).
pub const PLAYERS_CATALOG_JSON: &str = include_str!("../../../../data/players_catalog.json");

#[derive(Deserialize)]
struct Catalog {
    players: Vec<Player>,
}

static CATALOG: OnceLock<Vec<Player>> = OnceLock::new();

static BY_LEAGUE: Lazy<HashMap<LeagueCode, Vec<&'static Player>>> = Lazy::new(|| {
    let mut index: HashMap<LeagueCode, Vec<&'static Player>> = HashMap::new();
    for player in players() {
        index.entry(player.league).or_default().push(player);
    }
    index
});

/// Every catalog player. First call parses the embedded JSON, later calls
/// return the cached slice.
pub fn players() -> &'static [Player] {
    CATALOG
        .get_or_init(|| {
            let catalog: Catalog = serde_json::from_str(PLAYERS_CATALOG_JSON)
                .expect("Embedded player catalog JSON is corrupted");
            catalog.players
        })
        .as_slice()
}

/// Catalog players in one league, in catalog order.
pub fn players_in_league(league: LeagueCode) -> &'static [&'static Player] {
    BY_LEAGUE.get(&league).map(Vec::as_slice).unwrap_or(&[])
}
