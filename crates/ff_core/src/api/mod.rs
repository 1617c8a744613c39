pub mod squad_json;


pub use squad_json::{
    apply_squad_op_json, SquadOp, SquadOpRequest, SquadOpResponse, SquadStatus, SCHEMA_VERSION,
};
