//! Error types for the Resource actor.

use thiserror::Error;

/// Errors that can occur during resource operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A resource with the same id is already registered.
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// The resource data provided is invalid.
    #[error("Resource validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ResourceError {
    fn from(msg: String) -> Self {
        ResourceError::ActorCommunicationError(msg)
    }
}
