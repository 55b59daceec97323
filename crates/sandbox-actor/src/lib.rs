//! # Sandbox Actor
//!
//! Building blocks for the in-memory stores of the callback sandbox. Each store is an **actor**:
//! a Tokio task that owns a `HashMap` of entities and processes requests one at a time, reached
//! through a cloneable, type-safe client.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - the record and the mutations it accepts
//! 2. **Runtime** ([`EntityActor`]) - message loop and storage
//! 3. **Interface** ([`EntityClient`], [`ActorClient`]) - typed requests and replies
//!
//! Business logic is written once in the entity; the framework supplies message passing, error
//! mapping and logging.
//!
//! ## Context Injection
//!
//! Dependencies are passed to [`EntityActor::run`], not to the constructor, so actors can be
//! created first and wired afterwards:
//!
//! ```rust
//! use sandbox_actor::{ActorEntity, EntityActor, EntityClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Merchant { mch_id: String }
//! #[derive(Debug)] enum MerchantAction {}
//! #[derive(Debug, thiserror::Error)] #[error("merchant error")] struct MerchantError;
//!
//! #[async_trait]
//! impl ActorEntity for Merchant {
//!     type Id = String; type Action = MerchantAction; type ActionResult = ();
//!     type Context = (); type Error = MerchantError;
//!     fn id(&self) -> String { self.mch_id.clone() }
//!     async fn handle_action(&mut self, a: MerchantAction, _: &()) -> Result<(), MerchantError> {
//!         match a {}
//!     }
//! }
//!
//! #[derive(Clone, Debug)] struct Payment { id: String, mch_id: String }
//! #[derive(Debug)] enum PaymentAction {}
//! #[derive(Debug, thiserror::Error)] #[error("payment error")] struct PaymentError;
//!
//! #[async_trait]
//! impl ActorEntity for Payment {
//!     type Id = String; type Action = PaymentAction; type ActionResult = ();
//!     // Payments check their merchant on insert
//!     type Context = EntityClient<Merchant>;
//!     type Error = PaymentError;
//!     fn id(&self) -> String { self.id.clone() }
//!     async fn on_insert(&mut self, merchants: &EntityClient<Merchant>) -> Result<(), PaymentError> {
//!         match merchants.get(self.mch_id.clone()).await {
//!             Ok(Some(_)) => Ok(()),
//!             _ => Err(PaymentError),
//!         }
//!     }
//!     async fn handle_action(&mut self, a: PaymentAction, _: &EntityClient<Merchant>) -> Result<(), PaymentError> {
//!         match a {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (merchant_actor, merchants) = EntityActor::<Merchant>::new(10);
//!     let (payment_actor, payments) = EntityActor::<Payment>::new(10);
//!
//!     tokio::spawn(merchant_actor.run(()));
//!     tokio::spawn(payment_actor.run(merchants.clone()));
//!
//!     merchants.insert(Merchant { mch_id: "m1".into() }).await.unwrap();
//!     assert!(payments.insert(Payment { id: "tx".into(), mch_id: "m1".into() }).await.is_ok());
//!     assert!(payments.insert(Payment { id: "ty".into(), mch_id: "m2".into() }).await.is_err());
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Requests to one actor are processed **sequentially**, so an action observes and mutates the
//!   entity atomically
//! - Different actors run in parallel
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from scripted expectations, which is the easiest way to
//! inject store failures into code that depends on an [`EntityClient`].

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::EntityActor;
pub use client::EntityClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{EntityRequest, Response};
