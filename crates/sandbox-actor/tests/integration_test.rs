use async_trait::async_trait;
use sandbox_actor::{ActorEntity, EntityActor, FrameworkError};

// --- Test Entities ---

#[derive(Clone, Debug, PartialEq)]
struct Account {
    id: String,
    balance: i64,
}

#[derive(Debug)]
enum AccountAction {
    Deposit(i64),
    Withdraw(i64),
}

#[derive(Debug, thiserror::Error)]
enum AccountError {
    #[error("Insufficient funds: balance {0}")]
    InsufficientFunds(i64),
    #[error("Negative opening balance")]
    NegativeOpening,
}

#[async_trait]
impl ActorEntity for Account {
    type Id = String;
    type Action = AccountAction;
    type ActionResult = i64;
    type Context = ();
    type Error = AccountError;

    fn id(&self) -> String {
        self.id.clone()
    }

    async fn on_insert(&mut self, _ctx: &()) -> Result<(), AccountError> {
        if self.balance < 0 {
            return Err(AccountError::NegativeOpening);
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: AccountAction, _ctx: &()) -> Result<i64, AccountError> {
        match action {
            AccountAction::Deposit(n) => self.balance += n,
            AccountAction::Withdraw(n) => {
                if n > self.balance {
                    return Err(AccountError::InsufficientFunds(self.balance));
                }
                self.balance -= n;
            }
        }
        Ok(self.balance)
    }
}

/// An append-only journal created on first write.
#[derive(Clone, Debug, PartialEq)]
struct Journal {
    key: String,
    lines: Vec<String>,
}

#[derive(Debug)]
enum JournalAction {
    Append(String),
    Reject,
}

#[derive(Debug, thiserror::Error)]
#[error("Journal rejected write")]
struct JournalError;

#[async_trait]
impl ActorEntity for Journal {
    type Id = String;
    type Action = JournalAction;
    type ActionResult = usize;
    type Context = ();
    type Error = JournalError;

    fn id(&self) -> String {
        self.key.clone()
    }

    fn seed(id: &String) -> Option<Self> {
        Some(Self {
            key: id.clone(),
            lines: Vec::new(),
        })
    }

    async fn handle_action(&mut self, action: JournalAction, _ctx: &()) -> Result<usize, JournalError> {
        match action {
            JournalAction::Append(line) => {
                self.lines.push(line);
                Ok(self.lines.len())
            }
            JournalAction::Reject => Err(JournalError),
        }
    }
}

fn account(id: &str, balance: i64) -> Account {
    Account {
        id: id.to_string(),
        balance,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_entity_full_lifecycle() {
    let (actor, client) = EntityActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.insert(account("acc-1", 100)).await.unwrap();
    assert_eq!(id, "acc-1");

    let balance = client
        .perform_action(id.clone(), AccountAction::Deposit(50))
        .await
        .unwrap();
    assert_eq!(balance, 150);

    let balance = client
        .perform_action(id.clone(), AccountAction::Withdraw(120))
        .await
        .unwrap();
    assert_eq!(balance, 30);

    let snapshot = client.get(id.clone()).await.unwrap().unwrap();
    assert_eq!(snapshot, account("acc-1", 30));
}

#[tokio::test]
async fn test_duplicate_insert_rejected() {
    let (actor, client) = EntityActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    client.insert(account("acc-1", 10)).await.unwrap();
    let err = client.insert(account("acc-1", 99)).await.unwrap_err();
    assert!(matches!(err, FrameworkError::AlreadyExists(id) if id == "acc-1"));

    // First write wins
    let snapshot = client.get("acc-1".to_string()).await.unwrap().unwrap();
    assert_eq!(snapshot.balance, 10);
}

#[tokio::test]
async fn test_on_insert_rejection_leaves_store_untouched() {
    let (actor, client) = EntityActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.insert(account("acc-1", -5)).await.unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));
    assert!(client.get("acc-1".to_string()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_action_on_unknown_id_without_seed() {
    let (actor, client) = EntityActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    let err = client
        .perform_action("ghost".to_string(), AccountAction::Deposit(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(id) if id == "ghost"));
}

#[tokio::test]
async fn test_entity_error_is_reported_and_state_kept() {
    let (actor, client) = EntityActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    client.insert(account("acc-1", 10)).await.unwrap();
    let err = client
        .perform_action("acc-1".to_string(), AccountAction::Withdraw(11))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Entity error: Insufficient funds: balance 10");

    let snapshot = client.get("acc-1".to_string()).await.unwrap().unwrap();
    assert_eq!(snapshot.balance, 10);
}

#[tokio::test]
async fn test_seeded_entity_created_on_first_action() {
    let (actor, client) = EntityActor::<Journal>::new(10);
    tokio::spawn(actor.run(()));

    assert!(client.get("j".to_string()).await.unwrap().is_none());

    let n = client
        .perform_action("j".to_string(), JournalAction::Append("a".into()))
        .await
        .unwrap();
    assert_eq!(n, 1);
    let n = client
        .perform_action("j".to_string(), JournalAction::Append("b".into()))
        .await
        .unwrap();
    assert_eq!(n, 2);

    let journal = client.get("j".to_string()).await.unwrap().unwrap();
    assert_eq!(journal.lines, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_failed_first_action_does_not_leave_seed_behind() {
    let (actor, client) = EntityActor::<Journal>::new(10);
    tokio::spawn(actor.run(()));

    let result = client
        .perform_action("j".to_string(), JournalAction::Reject)
        .await;
    assert!(result.is_err());
    assert!(client.get("j".to_string()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_actions_are_serialized() {
    let (actor, client) = EntityActor::<Journal>::new(10);
    tokio::spawn(actor.run(()));

    let mut handles = Vec::new();
    for i in 0..50 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .perform_action("j".to_string(), JournalAction::Append(i.to_string()))
                .await
                .unwrap()
        }));
    }

    let mut positions = Vec::new();
    for handle in handles {
        positions.push(handle.await.unwrap());
    }
    positions.sort_unstable();

    // Every append observed a distinct length: no lost updates
    assert_eq!(positions, (1..=50).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_client_reports_closed_actor() {
    let (actor, client) = EntityActor::<Account>::new(10);
    drop(actor);

    let err = client.get("acc-1".to_string()).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
}
