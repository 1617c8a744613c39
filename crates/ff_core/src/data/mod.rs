//! Embedded engine data.
//!
//! The default player catalog ships inside the binary so the engine works
//! without any runtime file I/O.

pub mod catalog;

pub use catalog::{players, players_in_league, PLAYERS_CATALOG_JSON};
