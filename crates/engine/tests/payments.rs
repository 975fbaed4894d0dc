use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, Money, NewUser, PageRequest, TransferCmd, UserUpdate};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn user_with_balance(engine: &Engine, username: &str, minor: i64) -> i64 {
    engine
        .create_user(NewUser::new(username, "Test User").balance(Money::new(minor)))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_user_defaults_to_zero_balance() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .create_user(NewUser::new("  alice ", "Alice Liddell"))
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.balance, Money::ZERO);

    let fetched = engine.user(user.id).await.unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn create_user_rejects_bad_input() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_user(NewUser::new("   ", "Nobody"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_user(NewUser::new("bob", "Bob").balance(Money::new(-1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn duplicate_username_is_rejected_while_active() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 0).await;

    let err = engine
        .create_user(NewUser::new("alice", "Another Alice"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UserAlreadyExists("alice".to_string()));

    // A deleted user frees the username.
    engine.delete_user(id).await.unwrap();
    let again = engine
        .create_user(NewUser::new("alice", "Another Alice"))
        .await
        .unwrap();
    assert_ne!(again.id, id);
}

#[tokio::test]
async fn deleted_user_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 500).await;

    engine.delete_user(id).await.unwrap();

    assert_eq!(engine.user(id).await, Err(EngineError::UserNotFound(id)));
    assert_eq!(engine.delete_user(id).await, Err(EngineError::UserNotFound(id)));
    assert_eq!(
        engine.deposit(id, Money::new(100)).await,
        Err(EngineError::UserNotFound(id))
    );
    assert_eq!(
        engine.check_balance(id).await,
        Err(EngineError::UserNotFound(id))
    );
    assert_eq!(
        engine
            .payment_history(id, PageRequest::default())
            .await
            .unwrap_err(),
        EngineError::UserNotFound(id)
    );
}

#[tokio::test]
async fn update_user_applies_supplied_fields_only() {
    let (engine, _db) = engine_with_db().await;
    let alice = user_with_balance(&engine, "alice", 0).await;
    user_with_balance(&engine, "bob", 0).await;

    let updated = engine
        .update_user(alice, UserUpdate::default().full_name("Alice Cooper"))
        .await
        .unwrap();
    assert_eq!(updated.username, "alice");
    assert_eq!(updated.full_name, "Alice Cooper");

    let err = engine
        .update_user(alice, UserUpdate::default().username("bob"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UserAlreadyExists("bob".to_string()));

    // Keeping its own username is not a conflict.
    let same = engine
        .update_user(alice, UserUpdate::default().username("alice"))
        .await
        .unwrap();
    assert_eq!(same.username, "alice");

    assert!(matches!(
        engine.update_user(alice, UserUpdate::default()).await,
        Err(EngineError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn deposit_adds_to_balance_and_records_entry() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 10_00).await;

    let entry = engine.deposit(id, Money::new(25_50)).await.unwrap();
    assert_eq!(entry.amount, Money::new(25_50));
    assert_eq!(entry.user.id, id);
    assert_eq!(entry.user.balance, Money::new(35_50));
    assert_eq!(engine.check_balance(id).await.unwrap(), Money::new(35_50));

    let history = engine
        .payment_history(id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total_elements, 1);
    assert_eq!(history.content[0].amount, Money::new(25_50));
}

#[tokio::test]
async fn deposit_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 0).await;

    assert!(matches!(
        engine.deposit(id, Money::ZERO).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.withdraw(id, Money::new(-10)).await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn withdraw_never_overdraws() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 100_00).await;

    let entry = engine.withdraw(id, Money::new(30_00)).await.unwrap();
    assert_eq!(entry.amount, Money::new(-30_00));
    assert_eq!(engine.check_balance(id).await.unwrap(), Money::new(70_00));

    let err = engine.withdraw(id, Money::new(100_00)).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));
    assert_eq!(engine.check_balance(id).await.unwrap(), Money::new(70_00));

    let history = engine
        .payment_history(id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total_elements, 1);
    assert_eq!(history.content[0].amount, Money::new(-30_00));
}

#[tokio::test]
async fn withdraw_whole_balance_reaches_zero() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 42_00).await;

    engine.withdraw(id, Money::new(42_00)).await.unwrap();
    assert_eq!(engine.check_balance(id).await.unwrap(), Money::ZERO);
}

#[tokio::test]
async fn transfer_moves_money_and_writes_two_entries() {
    let (engine, _db) = engine_with_db().await;
    let alice = user_with_balance(&engine, "alice", 100_00).await;
    let bob = user_with_balance(&engine, "bob", 5_00).await;

    let entry = engine
        .transfer(TransferCmd::new(alice, bob, Money::new(40_00)))
        .await
        .unwrap();
    assert_eq!(entry.user.id, alice);
    assert_eq!(entry.amount, Money::new(-40_00));

    let alice_balance = engine.check_balance(alice).await.unwrap();
    let bob_balance = engine.check_balance(bob).await.unwrap();
    assert_eq!(alice_balance, Money::new(60_00));
    assert_eq!(bob_balance, Money::new(45_00));
    assert_eq!(alice_balance + bob_balance, Money::new(105_00));

    let bob_history = engine
        .payment_history(bob, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(bob_history.total_elements, 1);
    assert_eq!(bob_history.content[0].amount, Money::new(40_00));
}

#[tokio::test]
async fn transfer_failures_change_nothing() {
    let (engine, _db) = engine_with_db().await;
    let alice = user_with_balance(&engine, "alice", 10_00).await;
    let bob = user_with_balance(&engine, "bob", 0).await;

    let err = engine
        .transfer(TransferCmd::new(alice, bob, Money::new(10_01)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));

    let err = engine
        .transfer(TransferCmd::new(alice, alice, Money::new(1_00)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .transfer(TransferCmd::new(alice, 999, Money::new(1_00)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UserNotFound(999));

    assert_eq!(engine.check_balance(alice).await.unwrap(), Money::new(10_00));
    assert_eq!(engine.check_balance(bob).await.unwrap(), Money::ZERO);
    let history = engine
        .payment_history(alice, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total_elements, 0);
}

#[tokio::test]
async fn payment_history_is_paged_in_id_order() {
    let (engine, _db) = engine_with_db().await;
    let id = user_with_balance(&engine, "alice", 0).await;
    for minor in [1_00, 2_00, 3_00] {
        engine.deposit(id, Money::new(minor)).await.unwrap();
    }

    let first = engine
        .payment_history(id, PageRequest::new(0, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages, 2);
    let amounts: Vec<_> = first.content.iter().map(|entry| entry.amount).collect();
    assert_eq!(amounts, vec![Money::new(1_00), Money::new(2_00)]);

    let second = engine
        .payment_history(id, PageRequest::new(1, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(second.content.len(), 1);
    assert_eq!(second.content[0].amount, Money::new(3_00));
}

#[tokio::test]
async fn list_users_skips_deleted_rows() {
    let (engine, _db) = engine_with_db().await;
    let alice = user_with_balance(&engine, "alice", 0).await;
    let bob = user_with_balance(&engine, "bob", 0).await;
    let carol = user_with_balance(&engine, "carol", 0).await;
    engine.delete_user(bob).await.unwrap();

    let page = engine.list_users(PageRequest::default()).await.unwrap();
    let ids: Vec<_> = page.content.iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![alice, carol]);
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.total_pages, 1);
}
