//! # Callback Sandbox Demo
//!
//! Registers a merchant and a payment, streams delivery events as SSE frames and stops once the
//! delivery run has finished.
//!
//! ```bash
//! RUST_LOG=info cargo run -p callback-sandbox -- http://127.0.0.1:8081/notify
//! SANDBOX_NOTIFY_URL=http://127.0.0.1:8081/notify SANDBOX_DEFAULT_INTERVAL=1s cargo run -p callback-sandbox
//! ```

use callback_sandbox::broker::encode_sse;
use callback_sandbox::lifecycle::{setup_tracing, SandboxConfig, SandboxSystem};
use callback_sandbox::model::{Merchant, Resource};
use tracing::{error, info, Instrument};

const DEFAULT_NOTIFY_URL: &str = "http://127.0.0.1:8081/notify";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let notify_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SANDBOX_NOTIFY_URL").ok())
        .unwrap_or_else(|| DEFAULT_NOTIFY_URL.to_string());

    let config = SandboxConfig::from_env()?;
    let system = SandboxSystem::new(config)?;

    let mut subscription = system.broker.subscribe().await?;
    let observer = tokio::spawn(
        async move {
            while let Some(event) = subscription.recv().await {
                match encode_sse(&event) {
                    Ok(frame) => print!("{frame}"),
                    Err(e) => error!(error = %e, "Failed to encode event"),
                }
            }
        }
        .instrument(tracing::info_span!("observer")),
    );

    system
        .merchants
        .register(
            Merchant::new("1900000001", "wxd930ea5d5a258f4f")
                .with_description("Demo merchant")
                .with_notify_config(r#"{"interval":"2s","max_retries":3}"#)
                .with_notify_url(notify_url.clone()),
        )
        .await?;

    let id = system
        .register_and_trigger(Resource::payment(
            "4200000000000001",
            "1900000001",
            "wxd930ea5d5a258f4f",
            "DEMO-ORDER-0001",
            100,
        ))
        .await?;
    info!(resource_id = %id, %notify_url, "Payment registered, delivery triggered");

    system.coordinator.wait_idle().await;

    for attempt in system.coordinator.history(&id).await? {
        info!(
            sequence = attempt.sequence,
            outcome = %attempt.outcome,
            status_code = ?attempt.status_code,
            "Ledger row"
        );
    }

    system.shutdown().await?;
    // Broker is gone, so the stream ends.
    observer.await?;
    Ok(())
}
