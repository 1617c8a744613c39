//! Squad rules: observable rule constants and the pure constraint validator.

pub mod gameweek;
pub mod validator;

pub use validator::{can_add_player, can_set_starter, can_transfer, RuleCheck};

/// Total budget ceiling in currency units (millions).
pub const BUDGET: f32 = 100.0;

/// Full squad size.
pub const MAX_SQUAD_SIZE: usize = 15;

/// Starting XI size.
pub const MAX_STARTERS: usize = 11;

/// Bench capacity (squad minus starting XI).
pub const MAX_BENCH: usize = MAX_SQUAD_SIZE - MAX_STARTERS;

/// No club may contribute more than this many squad members.
pub const MAX_FROM_SAME_CLUB: usize = 3;

/// Free-transfer allowance at the start of a session.
pub const FREE_TRANSFERS: u32 = 1;

/// Point penalty per transfer beyond the free allowance.
pub const TRANSFER_PENALTY: u32 = 4;
