//! String-in, string-out JSON API over a transfer session, for frontends
//! that speak JSON rather than Rust types.
//!
//! Rule violations are part of the response (`success: false` with a
//! human-readable reason); only malformed JSON or an unsupported schema
//! version surfaces as a Rust error.

use serde::{Deserialize, Serialize};

use crate::data::catalog;
use crate::error::{Result, SquadError};
use crate::models::player::{Player, SquadPlayer};
use crate::models::Formation;
use crate::squad::TransferSession;

/// Wire schema version. Bump on breaking changes to the request or response
/// shape.
pub const SCHEMA_VERSION: u8 = 1;

/// One squad operation, as received from the frontend.
#[derive(Debug, Deserialize)]
pub struct SquadOpRequest {
    pub schema_version: u8,
    #[serde(flatten)]
    pub op: SquadOp,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SquadOp {
    AddPlayer { player: Player },
    RemovePlayer { player_id: String },
    TransferPlayer { out_id: String, incoming: Player },
    SetStarter { player_id: String, is_starter: bool },
    SwapPlayers { starter_id: String, bench_id: String },
    SetCaptain { player_id: String },
    SetViceCaptain { player_id: String },
    SetFormation { formation: Formation },
    ConfirmTransfers,
    CancelTransfers,
    ResetSquad,
    /// Complete the squad from a candidate pool; defaults to the embedded
    /// catalog when `pool` is omitted.
    AutoPick {
        #[serde(default)]
        pool: Option<Vec<Player>>,
    },
    SaveLineup,
    Status,
}

/// Response envelope: every operation, successful or not, returns the full
/// session status so frontends never need a follow-up query.
#[derive(Debug, Serialize)]
pub struct SquadOpResponse {
    pub schema_version: u8,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: SquadStatus,
}

/// Snapshot of the working squad and session counters.
#[derive(Debug, Serialize)]
pub struct SquadStatus {
    pub squad_size: usize,
    pub budget_remaining: f32,
    pub formation: Formation,
    pub starter_count: usize,
    pub changes_count: u32,
    pub free_transfers: u32,
    pub transfer_cost: u32,
    pub initial_squad_complete: bool,
    pub squad_dirty: bool,
    pub lineup_dirty: bool,
    pub all_leagues_covered: bool,
    pub players: Vec<SquadPlayer>,
}

impl SquadStatus {
    fn of(session: &TransferSession) -> Self {
        let roster = session.roster();
        Self {
            squad_size: roster.len(),
            budget_remaining: roster.budget_remaining(),
            formation: roster.formation(),
            starter_count: roster.starter_count(),
            changes_count: session.changes_count(),
            free_transfers: session.free_transfers(),
            transfer_cost: session.transfer_cost(),
            initial_squad_complete: session.initial_squad_complete(),
            squad_dirty: session.squad_dirty(),
            lineup_dirty: session.lineup_dirty(),
            all_leagues_covered: roster.all_leagues_covered(),
            players: roster.players().to_vec(),
        }
    }
}

/// Parse one request, apply it to `session` and return the response JSON.
pub fn apply_squad_op_json(session: &mut TransferSession, request_json: &str) -> Result<String> {
    let request: SquadOpRequest = serde_json::from_str(request_json)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(SquadError::SchemaVersionMismatch {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let outcome: Result<()> = match request.op {
        SquadOp::AddPlayer { player } => session.add_player(player),
        SquadOp::RemovePlayer { player_id } => session.remove_player(&player_id),
        SquadOp::TransferPlayer { out_id, incoming } => session.transfer_player(&out_id, incoming),
        SquadOp::SetStarter { player_id, is_starter } => {
            session.set_starter(&player_id, is_starter)
        }
        SquadOp::SwapPlayers { starter_id, bench_id } => {
            session.swap_players(&starter_id, &bench_id)
        }
        SquadOp::SetCaptain { player_id } => session.set_captain(&player_id),
        SquadOp::SetViceCaptain { player_id } => session.set_vice_captain(&player_id),
        SquadOp::SetFormation { formation } => {
            session.set_formation(formation);
            Ok(())
        }
        SquadOp::ConfirmTransfers => {
            session.confirm_transfers();
            Ok(())
        }
        SquadOp::CancelTransfers => {
            session.cancel_transfers();
            Ok(())
        }
        SquadOp::ResetSquad => {
            session.reset_squad();
            Ok(())
        }
        SquadOp::AutoPick { pool } => {
            match pool {
                Some(pool) => session.auto_pick(&pool),
                None => session.auto_pick(catalog::players()),
            }
            Ok(())
        }
        SquadOp::SaveLineup => {
            session.save_lineup();
            Ok(())
        }
        SquadOp::Status => Ok(()),
    };

    let response = match outcome {
        Ok(()) => SquadOpResponse {
            schema_version: SCHEMA_VERSION,
            success: true,
            error: None,
            status: SquadStatus::of(session),
        },
        // Domain errors are routine interactive outcomes; report them in
        // the envelope rather than failing the call.
        Err(err @ (SquadError::Json(_) | SquadError::SchemaVersionMismatch { .. })) => {
            return Err(err)
        }
        Err(err) => SquadOpResponse {
            schema_version: SCHEMA_VERSION,
            success: false,
            error: Some(err.to_string()),
            status: SquadStatus::of(session),
        },
    };

    Ok(serde_json::to_string(&response)?)
}
