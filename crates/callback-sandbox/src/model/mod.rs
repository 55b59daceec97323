//! # Domain Model
//!
//! Plain data shared by the actors, the delivery pipeline and observers.

pub mod attempt;
pub mod event;
pub mod merchant;
pub mod resource;

pub use attempt::{AttemptHistory, AttemptOutcome, DeliveryAttempt, LedgerSummary, NewAttempt};
pub use event::{BroadcastEvent, CALLBACK_EVENT};
pub use merchant::Merchant;
pub use resource::{CallbackStatus, Resource, ResourceDetails, ResourceId, ResourceKind};
