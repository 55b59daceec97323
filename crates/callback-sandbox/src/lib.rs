//! # Callback Sandbox
//!
//! Simulates a payment gateway's asynchronous merchant notifications for integration testing.
//! When a payment or refund reaches its terminal state, the sandbox POSTs a notification to the
//! merchant's URL, retries per the merchant's policy, records every attempt and streams the
//! outcomes to live observers.
//!
//! ## Architecture
//!
//! - **Stores** ([`resource_actor`], [`merchant_actor`], [`ledger_actor`]) - entity actors on
//!   [`sandbox_actor`], reached through [`clients`]
//! - **Policy** ([`policy`]) - per-merchant attempt budget and spacing
//! - **Sender** ([`sender`]) - payload construction and single HTTP attempts
//! - **Broker** ([`broker`]) - fan-out of delivery events to observers
//! - **Delivery** ([`delivery`]) - the coordinator, its lock registry and run pool
//! - **Lifecycle** ([`lifecycle`]) - configuration, wiring and shutdown
//!
//! ## Guarantees
//!
//! - At most one attempt per resource is in flight at any instant.
//! - Nothing is sent for a resource once an attempt was acknowledged.
//! - A resource never accumulates more attempts than its policy allows.
//! - Attempt sequence numbers are gapless per resource.

pub mod broker;
pub mod clients;
pub mod delivery;
pub mod ledger_actor;
pub mod lifecycle;
pub mod merchant_actor;
pub mod model;
pub mod policy;
pub mod resource_actor;
pub mod sender;
