//! # Resource Client
//!
//! High-level API for the Resource actor.
use crate::delivery::ports::{ResourceRepository, StoreError};
use crate::model::{CallbackStatus, Resource, ResourceId};
use crate::resource_actor::{ResourceAction, ResourceActionResult, ResourceError};
use async_trait::async_trait;
use sandbox_actor::{ActorClient, EntityClient, FrameworkError};
use tracing::{debug, instrument};

/// Client for interacting with the Resource actor.
#[derive(Clone)]
pub struct ResourceClient {
    inner: EntityClient<Resource>,
}

impl ResourceClient {
    pub fn new(inner: EntityClient<Resource>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Resource> for ResourceClient {
    type Error = ResourceError;

    fn inner(&self) -> &EntityClient<Resource> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> ResourceError {
        match e {
            FrameworkError::NotFound(id) => ResourceError::NotFound(id),
            FrameworkError::AlreadyExists(id) => ResourceError::AlreadyExists(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<ResourceError>() {
                Ok(err) => *err,
                Err(other) => ResourceError::ActorCommunicationError(other.to_string()),
            },
            other => ResourceError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl ResourceClient {
    /// Stores a payment or refund that reached its terminal state.
    #[instrument(skip(self, resource), fields(resource_id = %resource.id, kind = %resource.kind()))]
    pub async fn register(&self, resource: Resource) -> Result<ResourceId, ResourceError> {
        debug!("Sending request");
        self.inner.insert(resource).await.map_err(Self::map_error)
    }

    /// Writes back the latest delivery outcome and returns the previous status.
    #[instrument(skip(self, message))]
    pub async fn record_callback(
        &self,
        id: ResourceId,
        status: CallbackStatus,
        message: impl Into<String> + Send,
    ) -> Result<CallbackStatus, ResourceError> {
        debug!("Sending request");
        let action = ResourceAction::RecordCallback {
            status,
            message: message.into(),
        };
        match self
            .inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)?
        {
            ResourceActionResult::RecordCallback(previous) => Ok(previous),
        }
    }
}

#[async_trait]
impl ResourceRepository for ResourceClient {
    async fn load(&self, id: &ResourceId) -> Result<Option<Resource>, StoreError> {
        Ok(self.fetch(id.clone()).await?)
    }

    async fn update_callback_status(
        &self,
        id: &ResourceId,
        status: CallbackStatus,
        message: &str,
    ) -> Result<(), StoreError> {
        self.record_callback(id.clone(), status, message.to_string())
            .await?;
        Ok(())
    }
}
