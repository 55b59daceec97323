//! # Delivery Pipeline
//!
//! - [`ports`] - storage traits the pipeline consumes
//! - [`registry`] - per-resource attempt locks
//! - [`pool`] - bounded, supervised executor for runs
//! - [`coordinator`] - the retry loop itself
//!
//! Triggers never fail synchronously: problems are logged and become visible through the
//! ledger, the resource's callback status and broadcast events.

pub mod coordinator;
pub mod outcome;
pub mod pool;
pub mod ports;
pub mod registry;

pub use coordinator::{Collaborators, CoordinatorSettings, DeliveryCoordinator};
pub use outcome::RunOutcome;
pub use pool::RunPool;
pub use ports::{DeliveryLedger, MerchantDirectory, ResourceRepository, StoreError};
pub use registry::JobRegistry;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("run pool is shut down")]
    PoolClosed,

    #[error("run pool saturated ({capacity} runs pending)")]
    PoolSaturated { capacity: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode notification: {0}")]
    Payload(#[from] serde_json::Error),
}
