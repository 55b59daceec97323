use super::config::{ConfigError, SandboxConfig};
use crate::broker::{BrokerClient, EventBroker};
use crate::clients::{LedgerClient, MerchantClient, ResourceClient};
use crate::delivery::{Collaborators, DeliveryCoordinator};
use crate::model::{Resource, ResourceId};
use crate::policy::MerchantPolicyResolver;
use crate::resource_actor::ResourceError;
use crate::sender::http::SendError;
use crate::sender::{HttpNotificationSender, NotificationSender};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("notification sender: {0}")]
    Sender(#[from] SendError),

    #[error("actor task failed: {0}")]
    ActorTask(String),
}

/// The running callback sandbox: entity actors, event broker and delivery coordinator.
///
/// `SandboxSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping every actor task
/// - **Dependency Wiring**: handing the clients to the coordinator as its storage ports
///
/// # Example
///
/// ```rust,no_run
/// use callback_sandbox::lifecycle::{SandboxConfig, SandboxSystem};
/// use callback_sandbox::model::{Merchant, Resource};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let system = SandboxSystem::new(SandboxConfig::default())?;
///
/// system
///     .merchants
///     .register(Merchant::new("1900000001", "wx01").with_notify_url("http://127.0.0.1:8081/notify"))
///     .await?;
/// system
///     .register_and_trigger(Resource::payment("4200000001", "1900000001", "wx01", "ORDER-1", 100))
///     .await?;
///
/// system.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct SandboxSystem {
    pub resources: ResourceClient,
    pub merchants: MerchantClient,
    pub ledger: LedgerClient,
    pub broker: BrokerClient,
    pub coordinator: DeliveryCoordinator,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl SandboxSystem {
    /// Starts the system with the real HTTP sender. Must be called inside a Tokio runtime.
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        let sender = HttpNotificationSender::new(config.http_timeout, &config.user_agent)?;
        Self::with_sender(config, Arc::new(sender))
    }

    /// Starts the system with a caller-supplied sender.
    pub fn with_sender(
        config: SandboxConfig,
        sender: Arc<dyn NotificationSender>,
    ) -> Result<Self, SandboxError> {
        config.validate()?;

        // 1. Create actors (no dependencies)
        let (resource_actor, resource_client) = crate::resource_actor::new(config.store_capacity);
        let (merchant_actor, merchant_client) = crate::merchant_actor::new(config.store_capacity);
        let (ledger_actor, ledger_client) = crate::ledger_actor::new(config.store_capacity);
        let (broker, broker_client) =
            EventBroker::new(config.broker_capacity, config.subscriber_capacity);

        // 2. Start actors; none of the stores needs context
        let handles = vec![
            tokio::spawn(resource_actor.run(())),
            tokio::spawn(merchant_actor.run(())),
            tokio::spawn(ledger_actor.run(())),
            tokio::spawn(broker.run()),
        ];

        let resources = ResourceClient::new(resource_client);
        let merchants = MerchantClient::new(merchant_client);
        let ledger = LedgerClient::new(ledger_client);

        // 3. Wire the coordinator to the stores through their ports
        let merchant_directory = Arc::new(merchants.clone());
        let coordinator = DeliveryCoordinator::new(
            Collaborators {
                resources: Arc::new(resources.clone()),
                merchants: merchant_directory.clone(),
                ledger: Arc::new(ledger.clone()),
                policies: Arc::new(MerchantPolicyResolver::new(
                    merchant_directory,
                    config.default_policy,
                )),
                sender,
                broker: broker_client.clone(),
            },
            config.coordinator_settings(),
        );

        info!(
            max_concurrent_runs = config.max_concurrent_runs,
            default_max_attempts = config.default_policy.max_attempts,
            "Callback sandbox started"
        );

        Ok(Self {
            resources,
            merchants,
            ledger,
            broker: broker_client,
            coordinator,
            handles,
        })
    }

    /// Stores a resource that reached its terminal state and schedules its delivery.
    pub async fn register_and_trigger(&self, resource: Resource) -> Result<ResourceId, ResourceError> {
        let id = self.resources.register(resource).await?;
        self.coordinator.trigger_delivery(id.clone());
        Ok(id)
    }

    /// Gracefully shuts down the entire system.
    ///
    /// 1. Stops accepting delivery runs and waits for in-flight ones
    /// 2. Drops all clients, which closes the actors' channels
    /// 3. Waits for every actor task
    ///
    /// Clones of the clients held elsewhere keep their actor alive; drop them first.
    pub async fn shutdown(self) -> Result<(), SandboxError> {
        info!("Shutting down callback sandbox...");

        self.coordinator.shutdown().await;

        drop(self.coordinator);
        drop(self.resources);
        drop(self.merchants);
        drop(self.ledger);
        drop(self.broker);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SandboxError::ActorTask(e.to_string()));
            }
        }

        info!("Callback sandbox shutdown complete.");
        Ok(())
    }
}
