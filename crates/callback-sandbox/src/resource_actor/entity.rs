//! Entity trait implementation for [`Resource`].

use super::actions::{ResourceAction, ResourceActionResult};
use super::error::ResourceError;
use crate::model::{Resource, ResourceDetails, ResourceId};
use async_trait::async_trait;
use sandbox_actor::ActorEntity;
use tracing::debug;

#[async_trait]
impl ActorEntity for Resource {
    type Id = ResourceId;
    type Action = ResourceAction;
    type ActionResult = ResourceActionResult;
    type Context = ();
    type Error = ResourceError;

    fn id(&self) -> ResourceId {
        self.id.clone()
    }

    /// Rejects records the delivery pipeline could not route or describe.
    async fn on_insert(&mut self, _ctx: &()) -> Result<(), ResourceError> {
        if self.id.0.trim().is_empty() {
            return Err(ResourceError::ValidationError("empty resource id".into()));
        }
        if self.mch_id.trim().is_empty() {
            return Err(ResourceError::ValidationError(format!(
                "resource {} has no merchant",
                self.id
            )));
        }
        if self.amount < 0 {
            return Err(ResourceError::ValidationError(format!(
                "resource {} has negative amount {}",
                self.id, self.amount
            )));
        }
        if let ResourceDetails::Refund { total, .. } = self.details {
            if self.amount > total {
                return Err(ResourceError::ValidationError(format!(
                    "refund {} exceeds payment total ({} > {})",
                    self.id, self.amount, total
                )));
            }
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ResourceAction,
        _ctx: &(),
    ) -> Result<ResourceActionResult, ResourceError> {
        match action {
            ResourceAction::RecordCallback { status, message } => {
                let previous = self.callback_status;
                debug!(resource_id = %self.id, %previous, %status, "Recording callback status");
                self.callback_status = status;
                self.callback_msg = message;
                Ok(ResourceActionResult::RecordCallback(previous))
            }
        }
    }
}
