//! # Ledger Client
use crate::delivery::ports::{DeliveryLedger, StoreError};
use crate::ledger_actor::{LedgerAction, LedgerError};
use crate::model::{AttemptHistory, DeliveryAttempt, LedgerSummary, NewAttempt, ResourceId};
use async_trait::async_trait;
use sandbox_actor::{ActorClient, EntityClient, FrameworkError};
use tracing::{debug, instrument};

/// Client for interacting with the Ledger actor.
#[derive(Clone)]
pub struct LedgerClient {
    inner: EntityClient<AttemptHistory>,
}

impl LedgerClient {
    pub fn new(inner: EntityClient<AttemptHistory>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<AttemptHistory> for LedgerClient {
    type Error = LedgerError;

    fn inner(&self) -> &EntityClient<AttemptHistory> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> LedgerError {
        match e {
            FrameworkError::AlreadyExists(id) => LedgerError::AlreadyExists(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<LedgerError>() {
                Ok(err) => *err,
                Err(other) => LedgerError::ActorCommunicationError(other.to_string()),
            },
            other => LedgerError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl LedgerClient {
    /// Loads rows that already exist elsewhere, e.g. after a restart.
    ///
    /// Rejected if the history for this resource was already started or is not gapless.
    #[instrument(skip(self, history), fields(resource_id = %history.resource_id, rows = history.attempts.len()))]
    pub async fn import(&self, history: AttemptHistory) -> Result<ResourceId, LedgerError> {
        debug!("Sending request");
        self.inner.insert(history).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, attempt))]
    pub async fn record(
        &self,
        id: ResourceId,
        attempt: NewAttempt,
    ) -> Result<DeliveryAttempt, LedgerError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, LedgerAction::Append(attempt))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl DeliveryLedger for LedgerClient {
    async fn summary(&self, id: &ResourceId) -> Result<LedgerSummary, StoreError> {
        let history = self.fetch(id.clone()).await?;
        Ok(history.map(|h| h.summary()).unwrap_or_default())
    }

    async fn append(
        &self,
        id: &ResourceId,
        attempt: NewAttempt,
    ) -> Result<DeliveryAttempt, StoreError> {
        Ok(self.record(id.clone(), attempt).await?)
    }

    async fn history(&self, id: &ResourceId) -> Result<Vec<DeliveryAttempt>, StoreError> {
        let history = self.fetch(id.clone()).await?;
        Ok(history.map(|h| h.attempts).unwrap_or_default())
    }
}
