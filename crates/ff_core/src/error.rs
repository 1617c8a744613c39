use thiserror::Error;

/// Engine-level failures.
///
/// Routine rule violations ("budget exceeded", "position quota full") are
/// carried as `RuleViolation` so callers can surface the message to the user;
/// they are expected outcomes of normal interactive use, not bugs. The other
/// variants indicate a malformed call (unknown id, bad formation code, bad
/// request JSON).
#[derive(Error, Debug)]
pub enum SquadError {
    #[error("{0}")]
    RuleViolation(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Player is not a starter: {0}")]
    NotAStarter(String),

    #[error("Player is not on the bench: {0}")]
    NotOnBench(String),

    #[error("Invalid formation: {0}")]
    InvalidFormation(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    SchemaVersionMismatch { found: u8, expected: u8 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SquadError {
    /// True for failures that a user can act on from the UI, as opposed to
    /// malformed requests from the integration layer.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            SquadError::RuleViolation(_)
                | SquadError::PlayerNotFound(_)
                | SquadError::NotAStarter(_)
                | SquadError::NotOnBench(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SquadError>;
