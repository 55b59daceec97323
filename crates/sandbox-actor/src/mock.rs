//! # Mock Client
//!
//! `MockClient<T>` hands out a real [`EntityClient<T>`], but the requests it sends are answered
//! from a queue of scripted expectations instead of an [`EntityActor`](crate::EntityActor). This
//! makes failure paths (a store that is down, an action that is rejected) trivial to reach.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | none, scripted replies | real store |
//! | **Error injection** | `return_err` | requires specific state |
//! | **Use case** | logic *around* the client | the actor itself or the full system |
//!
//! ```rust
//! use sandbox_actor::mock::MockClient;
//! use sandbox_actor::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Payment { id: String }
//! #[derive(Debug)] enum PaymentAction {}
//! #[derive(Debug, thiserror::Error)] #[error("payment error")] struct PaymentError;
//!
//! #[async_trait]
//! impl ActorEntity for Payment {
//!     type Id = String; type Action = PaymentAction; type ActionResult = ();
//!     type Context = (); type Error = PaymentError;
//!     fn id(&self) -> String { self.id.clone() }
//!     async fn handle_action(&mut self, a: PaymentAction, _: &()) -> Result<(), PaymentError> {
//!         match a {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Payment>::new();
//!     mock.expect_get("tx-1".to_string()).return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert!(client.get("tx-1".to_string()).await.is_err());
//!     mock.verify();
//! }
//! ```

use crate::client::EntityClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::EntityRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation<T: ActorEntity> {
    Insert {
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next expectation (wrong
/// kind or wrong id) panics the background task, which surfaces to the caller as
/// [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: EntityClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<EntityRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        EntityRequest::Insert { respond_to, .. },
                        Some(Expectation::Insert { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        EntityRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "get called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        EntityRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "action called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: EntityClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> EntityClient<T> {
        self.client.clone()
    }

    pub fn expect_insert(&mut self) -> InsertExpectationBuilder<T> {
        InsertExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_action(&mut self, id: T::Id) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation has been consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder for `insert` expectations.
pub struct InsertExpectationBuilder<T: ActorEntity> {
    expectations: Expectations<T>,
}

impl<T: ActorEntity> InsertExpectationBuilder<T> {
    pub fn return_ok(self, id: T::Id) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Insert { response: Ok(id) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Insert {
                response: Err(error),
            });
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Expectations<T>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    pub fn return_ok(self, value: Option<T>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `action` expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Expectations<T>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    pub fn return_ok(self, result: T::ActionResult) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Action {
                id: self.id,
                response: Ok(result),
            });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Action {
                id: self.id,
                response: Err(error),
            });
    }
}

/// Creates a client whose requests land on a receiver the test controls.
///
/// Useful when the test wants to inspect the request itself or delay the reply.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (EntityClient<T>, mpsc::Receiver<EntityRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (EntityClient::new(sender), receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: String,
        text: String,
    }

    #[derive(Debug)]
    enum NoteAction {
        Append(String),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Note error")]
    struct NoteError;

    #[async_trait]
    impl ActorEntity for Note {
        type Id = String;
        type Action = NoteAction;
        type ActionResult = usize;
        type Context = ();
        type Error = NoteError;

        fn id(&self) -> String {
            self.id.clone()
        }

        async fn handle_action(&mut self, action: NoteAction, _: &()) -> Result<usize, NoteError> {
            match action {
                NoteAction::Append(s) => {
                    self.text.push_str(&s);
                    Ok(self.text.len())
                }
            }
        }
    }

    fn note(id: &str) -> Note {
        Note {
            id: id.to_string(),
            text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_mock_client_scripted_replies() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_insert().return_ok("n1".to_string());
        mock.expect_get("n1".to_string()).return_ok(Some(note("n1")));
        mock.expect_action("n1".to_string()).return_ok(7);

        let client = mock.client();
        assert_eq!(client.insert(note("n1")).await.unwrap(), "n1");
        assert_eq!(client.get("n1".to_string()).await.unwrap(), Some(note("n1")));
        let len = client
            .perform_action("n1".to_string(), NoteAction::Append("ignored".into()))
            .await
            .unwrap();
        assert_eq!(len, 7);

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_client_error_injection() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_action("n1".to_string())
            .return_err(FrameworkError::NotFound("n1".to_string()));

        let result = mock
            .client()
            .perform_action("n1".to_string(), NoteAction::Append("x".into()))
            .await;
        assert!(matches!(result, Err(FrameworkError::NotFound(id)) if id == "n1"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatch_surfaces_as_dropped() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_insert().return_ok("n1".to_string());

        let result = mock.client().get("n1".to_string()).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_panics_on_leftovers() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get("n1".to_string()).return_ok(None);
        mock.verify();
    }

    #[tokio::test]
    async fn test_create_mock_client_exposes_requests() {
        let (client, mut receiver) = create_mock_client::<Note>(4);

        let handle = tokio::spawn(async move { client.get("n9".to_string()).await });

        match receiver.recv().await {
            Some(EntityRequest::Get { id, respond_to }) => {
                assert_eq!(id, "n9");
                let _ = respond_to.send(Ok(None));
            }
            other => panic!("unexpected request: {:?}", other),
        }
        assert_eq!(handle.await.unwrap().unwrap(), None);
    }
}
