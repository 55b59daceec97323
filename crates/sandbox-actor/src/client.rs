//! # Generic Client
//!
//! `EntityClient<T>` is the cheap, cloneable handle to an [`EntityActor`](crate::EntityActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::EntityRequest;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with an `EntityActor`.
///
/// Holds only the request sender, so cloning is inexpensive. Every call sends one request and
/// awaits the reply on a fresh oneshot channel.
pub struct EntityClient<T: ActorEntity> {
    sender: mpsc::Sender<EntityRequest<T>>,
}

// Manual impl: `derive(Clone)` would demand `T: Clone` bounds on the generic parameters.
impl<T: ActorEntity> Clone for EntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> EntityClient<T> {
    pub fn new(sender: mpsc::Sender<EntityRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> EntityRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn insert(&self, item: T) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| EntityRequest::Insert { item, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| EntityRequest::Get { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| EntityRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}
