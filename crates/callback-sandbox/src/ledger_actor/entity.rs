//! Entity trait implementation for [`AttemptHistory`].

use super::actions::LedgerAction;
use super::error::LedgerError;
use crate::model::{AttemptHistory, DeliveryAttempt, ResourceId};
use async_trait::async_trait;
use sandbox_actor::ActorEntity;
use tracing::debug;

#[async_trait]
impl ActorEntity for AttemptHistory {
    type Id = ResourceId;
    type Action = LedgerAction;
    type ActionResult = DeliveryAttempt;
    type Context = ();
    type Error = LedgerError;

    fn id(&self) -> ResourceId {
        self.resource_id.clone()
    }

    fn seed(id: &ResourceId) -> Option<Self> {
        Some(AttemptHistory::new(id.clone()))
    }

    async fn on_insert(&mut self, _ctx: &()) -> Result<(), LedgerError> {
        for (index, attempt) in self.attempts.iter().enumerate() {
            let expected = index as u32 + 1;
            if attempt.sequence != expected {
                return Err(LedgerError::SequenceGap {
                    resource_id: self.resource_id.to_string(),
                    expected,
                    found: attempt.sequence,
                });
            }
            if attempt.resource_id != self.resource_id {
                return Err(LedgerError::ValidationError(format!(
                    "attempt {} belongs to {}, not {}",
                    attempt.sequence, attempt.resource_id, self.resource_id
                )));
            }
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: LedgerAction,
        _ctx: &(),
    ) -> Result<DeliveryAttempt, LedgerError> {
        match action {
            LedgerAction::Append(attempt) => {
                let sequence = self.count() + 1;
                let row = DeliveryAttempt::from_new(self.resource_id.clone(), sequence, attempt);
                debug!(resource_id = %self.resource_id, sequence, outcome = %row.outcome, "Attempt appended");
                self.attempts.push(row.clone());
                Ok(row)
            }
        }
    }
}
