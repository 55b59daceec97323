//! # Clients
//!
//! Domain-specific wrappers around [`EntityClient`](sandbox_actor::EntityClient). Each one maps
//! framework errors to its actor's error type and implements the storage port the delivery
//! pipeline consumes.

pub mod ledger_client;
pub mod merchant_client;
pub mod resource_client;

pub use ledger_client::LedgerClient;
pub use merchant_client::MerchantClient;
pub use resource_client::ResourceClient;
