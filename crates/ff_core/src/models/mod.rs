pub mod formation;
pub mod player;

pub use formation::Formation;
pub use player::{LeagueCode, Player, Position, SquadPlayer};
