//! # Ledger Actor
//!
//! Append-only delivery history. One [`AttemptHistory`](crate::model::AttemptHistory) entity
//! per resource, created on the first append.
//!
//! Sequence numbers are assigned inside the actor loop from the number of stored rows, so they
//! are gapless and monotonic no matter how many runs append concurrently. Histories imported
//! through `insert` (e.g. rows that existed before a restart) are validated to be gapless too, and
//! numbering continues after them.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::AttemptHistory;
use sandbox_actor::{EntityActor, EntityClient};

/// Creates a new Ledger actor and its client.
pub fn new(buffer_size: usize) -> (EntityActor<AttemptHistory>, EntityClient<AttemptHistory>) {
    EntityActor::new(buffer_size)
}
