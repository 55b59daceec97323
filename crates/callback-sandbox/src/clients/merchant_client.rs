//! # Merchant Client
use crate::delivery::ports::{MerchantDirectory, StoreError};
use crate::merchant_actor::{MerchantAction, MerchantError};
use crate::model::Merchant;
use async_trait::async_trait;
use sandbox_actor::{ActorClient, EntityClient, FrameworkError};
use tracing::{debug, instrument};

/// Client for interacting with the Merchant actor.
#[derive(Clone)]
pub struct MerchantClient {
    inner: EntityClient<Merchant>,
}

impl MerchantClient {
    pub fn new(inner: EntityClient<Merchant>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Merchant> for MerchantClient {
    type Error = MerchantError;

    fn inner(&self) -> &EntityClient<Merchant> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> MerchantError {
        match e {
            FrameworkError::NotFound(id) => MerchantError::NotFound(id),
            FrameworkError::AlreadyExists(id) => MerchantError::AlreadyExists(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<MerchantError>() {
                Ok(err) => *err,
                Err(other) => MerchantError::ActorCommunicationError(other.to_string()),
            },
            other => MerchantError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl MerchantClient {
    #[instrument(skip(self, merchant), fields(mch_id = %merchant.mch_id))]
    pub async fn register(&self, merchant: Merchant) -> Result<String, MerchantError> {
        debug!("Sending request");
        self.inner.insert(merchant).await.map_err(Self::map_error)
    }

    /// Replaces the raw notify config; the next delivery run uses it.
    #[instrument(skip(self, config))]
    pub async fn set_notify_config(
        &self,
        mch_id: String,
        config: impl Into<String> + Send,
    ) -> Result<(), MerchantError> {
        debug!("Sending request");
        self.inner
            .perform_action(mch_id, MerchantAction::SetNotifyConfig(config.into()))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn set_notify_urls(
        &self,
        mch_id: String,
        notify_url: String,
        refund_notify_url: String,
    ) -> Result<(), MerchantError> {
        debug!("Sending request");
        self.inner
            .perform_action(
                mch_id,
                MerchantAction::SetNotifyUrls {
                    notify_url,
                    refund_notify_url,
                },
            )
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl MerchantDirectory for MerchantClient {
    async fn find(&self, mch_id: &str) -> Result<Option<Merchant>, StoreError> {
        Ok(self.fetch(mch_id.to_string()).await?)
    }
}
