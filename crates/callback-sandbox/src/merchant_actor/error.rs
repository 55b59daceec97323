//! Error types for the Merchant actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MerchantError {
    #[error("Merchant not found: {0}")]
    NotFound(String),

    #[error("Merchant already exists: {0}")]
    AlreadyExists(String),

    #[error("Merchant validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for MerchantError {
    fn from(msg: String) -> Self {
        MerchantError::ActorCommunicationError(msg)
    }
}
