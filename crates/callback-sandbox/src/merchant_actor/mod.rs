//! # Merchant Actor
//!
//! Tenant directory: notify URLs and the raw retry configuration per `mch_id`.
//!
//! The delivery pipeline reads a merchant snapshot at the start of every run, so a
//! [`MerchantAction::SetNotifyConfig`] takes effect on the next run without restarting anything.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Merchant;
use sandbox_actor::{EntityActor, EntityClient};

/// Creates a new Merchant actor and its client.
pub fn new(buffer_size: usize) -> (EntityActor<Merchant>, EntityClient<Merchant>) {
    EntityActor::new(buffer_size)
}
