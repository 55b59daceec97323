//! Error types for the Ledger actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Attempt history already exists: {0}")]
    AlreadyExists(String),

    #[error("Sequence gap in history of {resource_id}: expected {expected}, found {found}")]
    SequenceGap {
        resource_id: String,
        expected: u32,
        found: u32,
    },

    #[error("Ledger validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for LedgerError {
    fn from(msg: String) -> Self {
        LedgerError::ActorCommunicationError(msg)
    }
}
