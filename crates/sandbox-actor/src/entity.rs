//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored record (a payment, a merchant, an attempt
//! history, …) implements so that a generic [`EntityActor`](crate::EntityActor) can own it.
//!
//! Unlike an auto-numbered CRUD store, entities here carry their own business identifier: the
//! gateway assigns `transaction_id`s and `refund_id`s, merchants arrive with their `mch_id`. The
//! actor therefore *inserts* entities under [`ActorEntity::id`] rather than generating keys.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::seed`]: lets an action create the entity on first use (append-only logs).
//! - [`ActorEntity::on_insert`]: validation before the entity becomes visible.
//!
//! Both default to "do nothing".

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record must implement to be managed by an `EntityActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they may await other actors. The `Context` associated type is
/// injected into every hook when the actor is started ("late binding"), which keeps actor
/// construction free of dependency cycles.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The business identifier (e.g. a transaction id).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Entity-specific mutation requests (e.g. `RecordCallback`).
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected at `run()` time. Use `()` if none are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per action: clients deal with a single type and
    /// match on its variants.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The key this entity is stored under.
    fn id(&self) -> Self::Id;

    /// Builds an empty entity when an action targets an unknown id.
    ///
    /// Returning `None` (the default) makes such actions fail with `NotFound`.
    fn seed(_id: &Self::Id) -> Option<Self> {
        None
    }

    /// Called before the entity is stored. An error rejects the insert.
    async fn on_insert(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle an entity-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
