//! # Resource Actor
//!
//! In-memory store of payments and refunds, keyed by [`ResourceId`](crate::model::ResourceId).
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](sandbox_actor::ActorEntity) implementation for
//!   [`Resource`](crate::model::Resource)
//! - [`error`] - [`ResourceError`]
//! - [`actions`] - [`ResourceAction`], the status write-back used by the delivery pipeline
//!
//! Every status write goes through the actor loop, so concurrent delivery runs for the same
//! resource never interleave partial updates.
//!
//! ## Usage
//!
//! ```rust
//! use callback_sandbox::clients::ResourceClient;
//! use callback_sandbox::model::{CallbackStatus, Resource};
//! use callback_sandbox::resource_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = resource_actor::new(32);
//!     let client = ResourceClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .register(Resource::payment("4200000001", "1900000001", "wx01", "ORDER-1", 100))
//!         .await?;
//!     client.record_callback(id, CallbackStatus::Fail, "connection refused").await?;
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Resource;
use sandbox_actor::{EntityActor, EntityClient};

/// Creates a new Resource actor and its client.
pub fn new(buffer_size: usize) -> (EntityActor<Resource>, EntityClient<Resource>) {
    EntityActor::new(buffer_size)
}
