use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QuerySelect,
};

use crate::{
    AddItemCmd, EngineError, Money, Page, PageRequest, ResultEngine, Transaction, TransactionItem,
    products,
    repository::{active, find_active_for_update, load_by_ids, paginate, soft_delete},
    transaction_items, transactions, users,
};

use super::{
    Engine, ensure_positive, ensure_positive_amount,
    payments::insufficient_balance,
    products::{product_with_category, products_with_categories},
    transactions::{
        require_transaction, require_transaction_for_update, set_total, transactions_with_users,
    },
    users::{require_user_for_update, set_balance},
};

async fn set_product_count<C: ConnectionTrait>(
    db: &C,
    product: products::Model,
    count: i64,
) -> ResultEngine<products::Model> {
    let mut model: products::ActiveModel = product.into();
    model.count = ActiveValue::Set(count);
    model.modified_at = ActiveValue::Set(Utc::now());
    Ok(model.update(db).await?)
}

/// Undo one purchased line inside an open transaction and return the updated
/// header.
///
/// Stock goes back to the product even if it was deleted since, and the
/// owner gets the line total back.
pub(super) async fn void_item<C: ConnectionTrait>(
    db: &C,
    item: transaction_items::Model,
    header: transactions::Model,
) -> ResultEngine<transactions::Model> {
    let product = products::Entity::find_by_id(item.product_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or(EngineError::ProductNotFound(item.product_id))?;
    let count = product.count.checked_add(item.count).ok_or_else(|| {
        EngineError::InvalidAmount(format!("product {} count overflow", product.id))
    })?;
    set_product_count(db, product, count).await?;

    let owner = users::Entity::find_by_id(header.user_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or(EngineError::UserNotFound(header.user_id))?;
    let balance = owner.balance().checked_add(item.total_amount())?;
    set_balance(db, owner, balance.minor()).await?;

    let total = header.total_amount().checked_sub(item.total_amount())?;
    let header = set_total(db, header, total.minor()).await?;

    soft_delete::<transaction_items::Entity, _>(db, item.id).await?;
    tracing::info!(
        item_id = item.id,
        transaction_id = header.id,
        refund = %item.total_amount(),
        "item voided"
    );
    Ok(header)
}

/// Attach product (with category) and header (with owner) snapshots.
async fn items_with_relations<C: ConnectionTrait>(
    db: &C,
    items: Vec<transaction_items::Model>,
) -> ResultEngine<Vec<TransactionItem>> {
    let product_models =
        load_by_ids::<products::Entity, _>(db, items.iter().map(|item| item.product_id)).await?;
    let products = products_with_categories(db, product_models.into_values().collect()).await?;

    let header_models = load_by_ids::<transactions::Entity, _>(
        db,
        items.iter().map(|item| item.transaction_id),
    )
    .await?;
    let headers = transactions_with_users(db, header_models.into_values().collect()).await?;

    items
        .into_iter()
        .map(|item| {
            let product = products
                .iter()
                .find(|product| product.id == item.product_id)
                .cloned()
                .ok_or(EngineError::ProductNotFound(item.product_id))?;
            let header = headers
                .iter()
                .find(|header| header.id == item.transaction_id)
                .cloned()
                .ok_or(EngineError::TransactionNotFound(item.transaction_id))?;
            Ok(TransactionItem::from((item, product, header)))
        })
        .collect()
}

impl Engine {
    /// Buy `count` units of a product inside an open purchase.
    ///
    /// Stock, the owner's balance and the purchase total change together or
    /// not at all. Fails with [`EngineError::InsufficientInventory`] when the
    /// stock is too low and [`EngineError::InsufficientBalance`] when the owner
    /// cannot pay for the line.
    pub async fn add_item(&self, cmd: AddItemCmd) -> ResultEngine<TransactionItem> {
        ensure_positive(cmd.count, "count")?;
        ensure_positive_amount(cmd.amount)?;
        let AddItemCmd {
            transaction_id,
            product_id,
            count,
            amount,
        } = cmd;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let header = require_transaction_for_update(db_tx, transaction_id).await?;
                let product = find_active_for_update::<products::Entity, _>(db_tx, product_id)
                    .await?
                    .ok_or(EngineError::ProductNotFound(product_id))?;

                if product.count < count {
                    return Err(EngineError::InsufficientInventory(format!(
                        "product {product_id} has {} left, requested {count}",
                        product.count
                    )));
                }
                let remaining = product.count - count;
                let product = set_product_count(db_tx, product, remaining).await?;

                let item_total: Money = amount.checked_mul(count)?;

                let owner = require_user_for_update(db_tx, header.user_id).await?;
                if owner.balance() < item_total {
                    return Err(insufficient_balance(&owner, item_total));
                }
                let balance = owner.balance().checked_sub(item_total)?;
                let owner = set_balance(db_tx, owner, balance.minor()).await?;

                let total = header.total_amount().checked_add(item_total)?;
                let header = set_total(db_tx, header, total.minor()).await?;

                let now = Utc::now();
                let item = transaction_items::ActiveModel {
                    product_id: ActiveValue::Set(product_id),
                    count: ActiveValue::Set(count),
                    amount_minor: ActiveValue::Set(amount.minor()),
                    total_amount_minor: ActiveValue::Set(item_total.minor()),
                    transaction_id: ActiveValue::Set(transaction_id),
                    deleted: ActiveValue::Set(false),
                    created_at: ActiveValue::Set(now),
                    modified_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;

                tracing::info!(
                    item_id = item.id,
                    transaction_id,
                    product_id,
                    count,
                    total = %item_total,
                    "item added"
                );

                let product = product_with_category(db_tx, product).await?;
                let header = Transaction::from((header, owner));
                Ok(TransactionItem::from((item, product, header)))
            })
        })
        .await
    }

    /// Items of an active purchase, oldest first.
    pub async fn items_by_transaction(
        &self,
        transaction_id: i64,
        page: PageRequest,
    ) -> ResultEngine<Page<TransactionItem>> {
        require_transaction(&self.database, transaction_id).await?;
        let select = active::<transaction_items::Entity>()
            .filter(transaction_items::Column::TransactionId.eq(transaction_id));
        let mut page = paginate(&self.database, select, page).await?;
        let items = std::mem::take(&mut page.content);
        let content = items_with_relations(&self.database, items).await?;
        Ok(page.with_content(content))
    }

    pub async fn list_items(&self, page: PageRequest) -> ResultEngine<Page<TransactionItem>> {
        let mut page =
            paginate(&self.database, active::<transaction_items::Entity>(), page).await?;
        let items = std::mem::take(&mut page.content);
        let content = items_with_relations(&self.database, items).await?;
        Ok(page.with_content(content))
    }

    /// Void a single purchased line: restock, refund and shrink the total.
    pub async fn delete_item(&self, item_id: i64) -> ResultEngine<()> {
        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let item = find_active_for_update::<transaction_items::Entity, _>(db_tx, item_id)
                    .await?
                    .ok_or(EngineError::TransactionItemNotFound(item_id))?;
                let header = transactions::Entity::find_by_id(item.transaction_id)
                    .lock_exclusive()
                    .one(db_tx)
                    .await?
                    .ok_or(EngineError::TransactionNotFound(item.transaction_id))?;

                void_item(db_tx, item, header).await?;
                Ok(())
            })
        })
        .await
    }
}
