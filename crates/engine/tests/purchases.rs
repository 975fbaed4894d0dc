use sea_orm::Database;

use engine::{
    AddItemCmd, CategoryUpdate, Engine, EngineError, Money, NewCategory, NewProduct, NewUser,
    PageRequest, ProductUpdate,
};
use migration::MigratorTrait;

struct Fixture {
    engine: Engine,
    user_id: i64,
    category_id: i64,
    product_id: i64,
}

/// A user with 100.00, one category and a product with 10 units in stock.
async fn fixture() -> Fixture {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let user_id = engine
        .create_user(NewUser::new("alice", "Alice").balance(Money::new(100_00)))
        .await
        .unwrap()
        .id;
    let category_id = engine
        .create_category(NewCategory::new("Drinks", 1).description("Cold and hot"))
        .await
        .unwrap()
        .id;
    let product_id = engine
        .create_product(NewProduct::new("Tea", 10, category_id))
        .await
        .unwrap()
        .id;

    Fixture {
        engine,
        user_id,
        category_id,
        product_id,
    }
}

#[tokio::test]
async fn add_item_updates_stock_balance_and_total() {
    let f = fixture().await;
    let tx = f.engine.create_transaction(f.user_id).await.unwrap();
    assert_eq!(tx.total_amount, Money::ZERO);

    let item = f
        .engine
        .add_item(AddItemCmd::new(tx.id, f.product_id, 3, Money::new(2_50)))
        .await
        .unwrap();
    assert_eq!(item.total_amount, Money::new(7_50));
    assert_eq!(item.product.count, 7);
    assert_eq!(item.product.category.name, "Drinks");
    assert_eq!(item.transaction.total_amount, Money::new(7_50));
    assert_eq!(item.transaction.user.balance, Money::new(92_50));

    let second = f
        .engine
        .add_item(AddItemCmd::new(tx.id, f.product_id, 1, Money::new(1_00)))
        .await
        .unwrap();
    assert_eq!(second.transaction.total_amount, Money::new(8_50));

    assert_eq!(f.engine.product(f.product_id).await.unwrap().count, 6);
    assert_eq!(
        f.engine.check_balance(f.user_id).await.unwrap(),
        Money::new(91_50)
    );
    assert_eq!(
        f.engine.transaction(tx.id).await.unwrap().total_amount,
        Money::new(8_50)
    );
}

#[tokio::test]
async fn add_item_beyond_stock_changes_nothing() {
    let f = fixture().await;
    let tx = f.engine.create_transaction(f.user_id).await.unwrap();

    let err = f
        .engine
        .add_item(AddItemCmd::new(tx.id, f.product_id, 11, Money::new(1_00)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientInventory(_)));

    assert_eq!(f.engine.product(f.product_id).await.unwrap().count, 10);
    assert_eq!(
        f.engine.check_balance(f.user_id).await.unwrap(),
        Money::new(100_00)
    );
    assert_eq!(
        f.engine.transaction(tx.id).await.unwrap().total_amount,
        Money::ZERO
    );
}

#[tokio::test]
async fn add_item_too_expensive_rolls_back_stock() {
    let f = fixture().await;
    let tx = f.engine.create_transaction(f.user_id).await.unwrap();

    // Stock is enough, the balance is not: the decrement must be undone.
    let err = f
        .engine
        .add_item(AddItemCmd::new(tx.id, f.product_id, 5, Money::new(30_00)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));

    assert_eq!(f.engine.product(f.product_id).await.unwrap().count, 10);
    assert_eq!(
        f.engine.check_balance(f.user_id).await.unwrap(),
        Money::new(100_00)
    );
    let items = f
        .engine
        .items_by_transaction(tx.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(items.total_elements, 0);
}

#[tokio::test]
async fn add_item_requires_live_rows() {
    let f = fixture().await;
    let tx = f.engine.create_transaction(f.user_id).await.unwrap();

    assert_eq!(
        f.engine
            .add_item(AddItemCmd::new(tx.id, 404, 1, Money::new(1_00)))
            .await
            .unwrap_err(),
        EngineError::ProductNotFound(404)
    );
    assert_eq!(
        f.engine
            .add_item(AddItemCmd::new(404, f.product_id, 1, Money::new(1_00)))
            .await
            .unwrap_err(),
        EngineError::TransactionNotFound(404)
    );
    assert!(matches!(
        f.engine
            .add_item(AddItemCmd::new(tx.id, f.product_id, 0, Money::new(1_00)))
            .await,
        Err(EngineError::InvalidInput(_))
    ));

    f.engine.delete_transaction(tx.id).await.unwrap();
    assert_eq!(
        f.engine
            .add_item(AddItemCmd::new(tx.id, f.product_id, 1, Money::new(1_00)))
            .await
            .unwrap_err(),
        EngineError::TransactionNotFound(tx.id)
    );
    assert_eq!(
        f.engine
            .items_by_transaction(tx.id, PageRequest::default())
            .await
            .unwrap_err(),
        EngineError::TransactionNotFound(tx.id)
    );
}

#[tokio::test]
async fn create_transaction_needs_an_active_user() {
    let f = fixture().await;
    assert_eq!(
        f.engine.create_transaction(999).await.unwrap_err(),
        EngineError::UserNotFound(999)
    );

    f.engine.create_transaction(f.user_id).await.unwrap();
    f.engine.create_transaction(f.user_id).await.unwrap();
    let history = f
        .engine
        .transaction_history(f.user_id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total_elements, 2);
    assert!(history.content[0].id < history.content[1].id);
}

#[tokio::test]
async fn delete_item_restocks_and_refunds() {
    let f = fixture().await;
    let tx = f.engine.create_transaction(f.user_id).await.unwrap();
    let keep = f
        .engine
        .add_item(AddItemCmd::new(tx.id, f.product_id, 2, Money::new(5_00)))
        .await
        .unwrap();
    let voided = f
        .engine
        .add_item(AddItemCmd::new(tx.id, f.product_id, 3, Money::new(4_00)))
        .await
        .unwrap();

    // Restocking works even after the product was deleted.
    f.engine.delete_product(f.product_id).await.unwrap();
    f.engine.delete_item(voided.id).await.unwrap();

    assert_eq!(
        f.engine.check_balance(f.user_id).await.unwrap(),
        Money::new(90_00)
    );
    assert_eq!(
        f.engine.transaction(tx.id).await.unwrap().total_amount,
        Money::new(10_00)
    );
    let items = f
        .engine
        .items_by_transaction(tx.id, PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<_> = items.content.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![keep.id]);

    assert_eq!(
        f.engine.delete_item(voided.id).await,
        Err(EngineError::TransactionItemNotFound(voided.id))
    );
}

#[tokio::test]
async fn delete_transaction_voids_every_item() {
    let f = fixture().await;
    let tx = f.engine.create_transaction(f.user_id).await.unwrap();
    for count in [1, 2, 3] {
        f.engine
            .add_item(AddItemCmd::new(tx.id, f.product_id, count, Money::new(1_50)))
            .await
            .unwrap();
    }
    assert_eq!(f.engine.product(f.product_id).await.unwrap().count, 4);

    f.engine.delete_transaction(tx.id).await.unwrap();

    assert_eq!(f.engine.product(f.product_id).await.unwrap().count, 10);
    assert_eq!(
        f.engine.check_balance(f.user_id).await.unwrap(),
        Money::new(100_00)
    );
    assert_eq!(
        f.engine.transaction(tx.id).await.unwrap_err(),
        EngineError::TransactionNotFound(tx.id)
    );
    let all_items = f.engine.list_items(PageRequest::default()).await.unwrap();
    assert_eq!(all_items.total_elements, 0);
    assert_eq!(
        f.engine.delete_transaction(tx.id).await,
        Err(EngineError::TransactionNotFound(tx.id))
    );
}

#[tokio::test]
async fn list_items_spans_transactions() {
    let f = fixture().await;
    let first = f.engine.create_transaction(f.user_id).await.unwrap();
    let second = f.engine.create_transaction(f.user_id).await.unwrap();
    f.engine
        .add_item(AddItemCmd::new(first.id, f.product_id, 1, Money::new(1_00)))
        .await
        .unwrap();
    f.engine
        .add_item(AddItemCmd::new(second.id, f.product_id, 1, Money::new(2_00)))
        .await
        .unwrap();

    let page = f
        .engine
        .list_items(PageRequest::new(0, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content[0].transaction.id, first.id);

    let all = f
        .engine
        .list_transactions(PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total_elements, 2);
    assert_eq!(all.content[1].total_amount, Money::new(2_00));
}

#[tokio::test]
async fn product_names_are_unique_among_active_rows() {
    let f = fixture().await;

    assert_eq!(
        f.engine
            .create_product(NewProduct::new("Tea", 1, f.category_id))
            .await
            .unwrap_err(),
        EngineError::ProductAlreadyExists("Tea".to_string())
    );
    assert_eq!(
        f.engine
            .create_product(NewProduct::new("Coffee", 1, 77))
            .await
            .unwrap_err(),
        EngineError::CategoryNotFound(77)
    );

    let coffee = f
        .engine
        .create_product(NewProduct::new("Coffee", 4, f.category_id))
        .await
        .unwrap();
    assert_eq!(
        f.engine
            .update_product(coffee.id, ProductUpdate::default().name("Tea"))
            .await
            .unwrap_err(),
        EngineError::ProductAlreadyExists("Tea".to_string())
    );

    let restocked = f
        .engine
        .update_product(coffee.id, ProductUpdate::default().count(40))
        .await
        .unwrap();
    assert_eq!(restocked.count, 40);
    assert_eq!(restocked.name, "Coffee");
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let f = fixture().await;

    assert_eq!(
        f.engine.delete_category(f.category_id).await,
        Err(EngineError::CategoryInUse(f.category_id))
    );

    f.engine.delete_product(f.product_id).await.unwrap();
    f.engine.delete_category(f.category_id).await.unwrap();
    assert_eq!(
        f.engine.category(f.category_id).await,
        Err(EngineError::CategoryNotFound(f.category_id))
    );
    assert!(f.engine.all_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn category_updates_keep_names_unique() {
    let f = fixture().await;
    let snacks = f
        .engine
        .create_category(NewCategory::new("Snacks", 2))
        .await
        .unwrap();

    assert_eq!(
        f.engine
            .update_category(snacks.id, CategoryUpdate::default().name("Drinks"))
            .await
            .unwrap_err(),
        EngineError::CategoryAlreadyExists("Drinks".to_string())
    );
    assert!(matches!(
        f.engine
            .update_category(snacks.id, CategoryUpdate::default().order(0))
            .await,
        Err(EngineError::InvalidInput(_))
    ));

    let moved = f
        .engine
        .update_category(snacks.id, CategoryUpdate::default().order(5))
        .await
        .unwrap();
    assert_eq!(moved.order, 5);
    assert_eq!(moved.name, "Snacks");

    let product = f
        .engine
        .update_product(f.product_id, ProductUpdate::default().category_id(snacks.id))
        .await
        .unwrap();
    assert_eq!(product.category.id, snacks.id);

    let page = f
        .engine
        .list_categories(PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 2);
}
