//! # ff_core - Fantasy Football Squad Construction & Transfer Rules Engine
//!
//! Multi-league fantasy football rules engine: a 15-player roster store, a
//! pure constraint validator, a cancellable transfer session with confirmed
//! and working squad generations, and a deterministic auto-pick planner.
//!
//! ## Features
//! - Fixed rules: €100.0M budget, 2 GK / 5 DEF / 5 MID / 3 FWD, max 3 per club
//! - Transfer accounting with a free-transfer allowance and 4-point penalty
//! - Reservation-aware greedy auto-pick that never strands the budget
//! - JSON API for frontends that do not link against Rust

pub mod api;
pub mod data;
pub mod error;
pub mod models;
pub mod rules;
pub mod squad;
pub mod state;

pub use api::{apply_squad_op_json, SquadOp, SquadOpRequest, SquadOpResponse, SquadStatus};
pub use error::{Result, SquadError};
pub use models::{Formation, LeagueCode, Player, Position, SquadPlayer};
pub use rules::validator::{can_add_player, can_set_starter, can_transfer, RuleCheck};
pub use rules::{
    BUDGET, FREE_TRANSFERS, MAX_BENCH, MAX_FROM_SAME_CLUB, MAX_SQUAD_SIZE, MAX_STARTERS,
    TRANSFER_PENALTY,
};
pub use squad::{auto_pick, LineupSnapshot, Roster, TransferSession};
pub use state::{SessionHandle, SessionRegistry};

/// Crate version, for embedders that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
