//! # Lifecycle
//!
//! - [`SandboxConfig`] - defaults and `SANDBOX_*` environment overrides
//! - [`SandboxSystem`] - starts, wires and stops every actor
//! - [`setup_tracing`] - structured logging, filtered by `RUST_LOG`
//!
//! ```bash
//! RUST_LOG=info cargo run -p callback-sandbox              # run summaries
//! RUST_LOG=debug cargo run -p callback-sandbox             # every request and attempt
//! ```

pub mod config;
pub mod sandbox_system;

pub use config::{ConfigError, SandboxConfig};
pub use sandbox_actor::tracing::{setup_tracing, try_setup_tracing};
pub use sandbox_system::{SandboxError, SandboxSystem};
