use crate::protocols::token::TokenInstructionKind;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("token transfer not found for {kind} of {amount} raw units issued by {program_id}")]
    TokenTransferNotFound {
        kind: TokenInstructionKind,
        amount: u64,
        program_id: String,
    },

    #[error("decode error: {reason}")]
    Decode { reason: String },

    #[error("protocol error: {reason}")]
    Protocol { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
