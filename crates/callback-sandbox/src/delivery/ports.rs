//! Storage boundaries the coordinator depends on.
//!
//! The actor-backed clients in [`crate::clients`] implement these traits; tests substitute
//! their own implementations (or the framework's `MockClient`) to inject failures.

use crate::ledger_actor::LedgerError;
use crate::merchant_actor::MerchantError;
use crate::model::{
    CallbackStatus, DeliveryAttempt, LedgerSummary, Merchant, NewAttempt, Resource, ResourceId,
};
use crate::resource_actor::ResourceError;
use async_trait::async_trait;
use thiserror::Error;

/// A storage collaborator failed. Aborts the current delivery run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("resource store: {0}")]
    Resource(#[from] ResourceError),

    #[error("merchant directory: {0}")]
    Merchant(#[from] MerchantError),

    #[error("delivery ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Read-a-snapshot / write-back-status access to payments and refunds.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// The latest persisted snapshot, `None` if unknown.
    async fn load(&self, id: &ResourceId) -> Result<Option<Resource>, StoreError>;

    async fn update_callback_status(
        &self,
        id: &ResourceId,
        status: CallbackStatus,
        message: &str,
    ) -> Result<(), StoreError>;
}

/// Append-only record of delivery attempts.
#[async_trait]
pub trait DeliveryLedger: Send + Sync {
    /// Attempts ever persisted for `id` and whether one of them was acknowledged.
    async fn summary(&self, id: &ResourceId) -> Result<LedgerSummary, StoreError>;

    /// Persists `attempt` under the next sequence number and returns the stored row.
    async fn append(&self, id: &ResourceId, attempt: NewAttempt)
        -> Result<DeliveryAttempt, StoreError>;

    /// All attempts for `id` in sequence order.
    async fn history(&self, id: &ResourceId) -> Result<Vec<DeliveryAttempt>, StoreError>;
}

#[async_trait]
pub trait MerchantDirectory: Send + Sync {
    async fn find(&self, mch_id: &str) -> Result<Option<Merchant>, StoreError>;
}
