//! # ActorClient Trait
//!
//! Common surface for entity-specific clients: a domain client wraps an [`EntityClient`], names
//! its own error type and inherits `fetch`.
use crate::{ActorEntity, EntityClient, FrameworkError};
use async_trait::async_trait;

/// Trait for entity-specific clients to inherit the standard read operation.
///
/// # Example
///
/// ```rust
/// use sandbox_actor::{ActorClient, ActorEntity, EntityClient, FrameworkError};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Merchant { mch_id: String }
/// #[derive(Debug)] enum MerchantAction {}
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct MerchantError(String);
/// impl From<String> for MerchantError { fn from(s: String) -> Self { MerchantError(s) } }
///
/// #[async_trait]
/// impl ActorEntity for Merchant {
///     type Id = String; type Action = MerchantAction; type ActionResult = ();
///     type Context = (); type Error = MerchantError;
///     fn id(&self) -> String { self.mch_id.clone() }
///     async fn handle_action(&mut self, a: MerchantAction, _: &()) -> Result<(), MerchantError> {
///         match a {}
///     }
/// }
///
/// struct MerchantClient { inner: EntityClient<Merchant> }
///
/// #[async_trait]
/// impl ActorClient<Merchant> for MerchantClient {
///     type Error = MerchantError;
///     fn inner(&self) -> &EntityClient<Merchant> { &self.inner }
///     fn map_error(e: FrameworkError) -> MerchantError { MerchantError(e.to_string()) }
/// }
///
/// async fn usage(client: MerchantClient) {
///     // fetch() is provided automatically
///     let _ = client.fetch("1900000001".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The entity-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic EntityClient.
    fn inner(&self) -> &EntityClient<T>;

    /// Map framework errors to the entity error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity snapshot by id.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }
}
