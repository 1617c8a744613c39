//! Squad state: the roster itself, the transfer session wrapped around it,
//! and the auto-pick planner that completes partial rosters.

pub mod autopick;
pub mod roster;
pub mod session;

pub use autopick::auto_pick;
pub use roster::Roster;
pub use session::{LineupSnapshot, TransferSession};
