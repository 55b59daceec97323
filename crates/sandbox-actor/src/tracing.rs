//! # Tracing Setup
//!
//! Structured logging for every actor built on this crate. Actors log with an `entity_type`
//! field, so module targets are hidden from the output.
//!
//! | Level | Content |
//! |-------|---------|
//! | `info` | actor start/shutdown, inserts, delivery run summaries |
//! | `debug` | every request, every delivery attempt |
//! | `warn` | rejected requests, failed attempts, dropped events |
//!
//! ```bash
//! RUST_LOG=info cargo run -p callback-sandbox
//! RUST_LOG=callback_sandbox=debug,sandbox_actor=info cargo run -p callback-sandbox
//! ```

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already installed; call it once from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but tolerates an existing subscriber. Intended for tests.
pub fn try_setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}
