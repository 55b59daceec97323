//! # Generic Messages
//!
//! The request enum carried from an [`EntityClient`](crate::EntityClient) to its
//! [`EntityActor`](crate::EntityActor). Each variant carries a oneshot sender for the reply.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Requests understood by every entity actor.
///
/// - **Insert**: store a new entity under its own id; duplicates are rejected.
/// - **Get**: read a snapshot (a clone) of the current state.
/// - **Action**: run an entity-specific mutation; may seed the entity first.
///
/// The enum is generic over `T: ActorEntity`, so a merchant action can never be sent to the
/// ledger actor.
#[derive(Debug)]
pub enum EntityRequest<T: ActorEntity> {
    Insert {
        item: T,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
