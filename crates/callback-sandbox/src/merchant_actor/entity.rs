//! Entity trait implementation for [`Merchant`].

use super::actions::MerchantAction;
use super::error::MerchantError;
use crate::model::Merchant;
use async_trait::async_trait;
use sandbox_actor::ActorEntity;
use tracing::info;

#[async_trait]
impl ActorEntity for Merchant {
    type Id = String;
    type Action = MerchantAction;
    type ActionResult = ();
    type Context = ();
    type Error = MerchantError;

    fn id(&self) -> String {
        self.mch_id.clone()
    }

    async fn on_insert(&mut self, _ctx: &()) -> Result<(), MerchantError> {
        if self.mch_id.trim().is_empty() {
            return Err(MerchantError::ValidationError("empty mch_id".into()));
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: MerchantAction, _ctx: &()) -> Result<(), MerchantError> {
        match action {
            MerchantAction::SetNotifyConfig(config) => {
                info!(mch_id = %self.mch_id, %config, "Notify config updated");
                self.notify_config = config;
            }
            MerchantAction::SetNotifyUrls {
                notify_url,
                refund_notify_url,
            } => {
                info!(mch_id = %self.mch_id, %notify_url, %refund_notify_url, "Notify URLs updated");
                self.notify_url = notify_url;
                self.refund_notify_url = refund_notify_url;
            }
        }
        Ok(())
    }
}
