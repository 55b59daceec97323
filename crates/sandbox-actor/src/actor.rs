//! # Generic Entity Actor
//!
//! `EntityActor<T>` is the server half of the framework: it owns an in-memory store of `T` and
//! processes [`EntityRequest`]s one at a time. Because every write goes through this single loop,
//! concurrent writers are serialized without a `Mutex` around the store.

use crate::client::EntityClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::EntityRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities keyed by their business id.
///
/// # Usage Pattern
///
/// 1.  **Create**: `EntityActor::new()` returns the actor (server) and client (interface).
/// 2.  **Wire**: pass dependencies into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use sandbox_actor::{ActorEntity, EntityActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Counter { id: String, hits: u32 }
/// #[derive(Debug)] enum CounterAction { Hit }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = String;
///     type Action = CounterAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = CounterError;
///
///     fn id(&self) -> String { self.id.clone() }
///     fn seed(id: &String) -> Option<Self> { Some(Self { id: id.clone(), hits: 0 }) }
///     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, CounterError> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = EntityActor::<Counter>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let hits = client.perform_action("page".to_string(), CounterAction::Hit).await.unwrap();
///     assert_eq!(hits, 1);
/// }
/// ```
pub struct EntityActor<T: ActorEntity> {
    receiver: mpsc::Receiver<EntityRequest<T>>,
    store: HashMap<T::Id, T>,
}

impl<T: ActorEntity> EntityActor<T> {
    /// Creates a new `EntityActor` and its associated `EntityClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, client calls wait
    /// for space.
    pub fn new(buffer_size: usize) -> (Self, EntityClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
        };
        (actor, EntityClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        // "Resource" instead of "callback_sandbox::model::resource::Resource"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                EntityRequest::Insert {
                    mut item,
                    respond_to,
                } => {
                    let id = item.id();
                    debug!(entity_type, %id, "Insert");
                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }
                    if let Err(e) = item.on_insert(&context).await {
                        warn!(entity_type, %id, error = %e, "on_insert failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Inserted");
                    let _ = respond_to.send(Ok(id));
                }
                EntityRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                EntityRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let seeded = !self.store.contains_key(&id);
                    if seeded {
                        match T::seed(&id) {
                            Some(item) => {
                                self.store.insert(id.clone(), item);
                            }
                            None => {
                                warn!(entity_type, %id, "Not found");
                                let _ =
                                    respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                                continue;
                            }
                        }
                    }

                    let Some(item) = self.store.get_mut(&id) else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => debug!(entity_type, %id, "Action ok"),
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            if seeded {
                                self.store.remove(&id);
                            }
                        }
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
