use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, QueryFilter};

use crate::{
    EngineError, Page, PageRequest, ResultEngine, Transaction, transaction_items, transactions,
    repository::{active, find_active, find_active_for_update, load_by_ids, paginate, soft_delete},
    users,
};

use super::{Engine, items::void_item, users::require_user};

pub(super) async fn require_transaction<C: ConnectionTrait>(
    db: &C,
    transaction_id: i64,
) -> ResultEngine<transactions::Model> {
    find_active::<transactions::Entity, _>(db, transaction_id)
        .await?
        .ok_or(EngineError::TransactionNotFound(transaction_id))
}

pub(super) async fn require_transaction_for_update<C: ConnectionTrait>(
    db: &C,
    transaction_id: i64,
) -> ResultEngine<transactions::Model> {
    find_active_for_update::<transactions::Entity, _>(db, transaction_id)
        .await?
        .ok_or(EngineError::TransactionNotFound(transaction_id))
}

/// Persist a new running total and bump `modified_at`.
pub(super) async fn set_total<C: ConnectionTrait>(
    db: &C,
    header: transactions::Model,
    total_amount_minor: i64,
) -> ResultEngine<transactions::Model> {
    let mut model: transactions::ActiveModel = header.into();
    model.total_amount_minor = ActiveValue::Set(total_amount_minor);
    model.modified_at = ActiveValue::Set(Utc::now());
    Ok(model.update(db).await?)
}

/// Attach the owner snapshot to each header.
pub(super) async fn transactions_with_users<C: ConnectionTrait>(
    db: &C,
    headers: Vec<transactions::Model>,
) -> ResultEngine<Vec<Transaction>> {
    let owners =
        load_by_ids::<users::Entity, _>(db, headers.iter().map(|header| header.user_id)).await?;

    headers
        .into_iter()
        .map(|header| {
            let owner = owners
                .get(&header.user_id)
                .cloned()
                .ok_or(EngineError::UserNotFound(header.user_id))?;
            Ok(Transaction::from((header, owner)))
        })
        .collect()
}

impl Engine {
    /// Open an empty purchase for an active user.
    ///
    /// The balance is only checked when items are added.
    pub async fn create_transaction(&self, user_id: i64) -> ResultEngine<Transaction> {
        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let owner = require_user(db_tx, user_id).await?;

                let now = Utc::now();
                let header = transactions::ActiveModel {
                    user_id: ActiveValue::Set(user_id),
                    total_amount_minor: ActiveValue::Set(0),
                    date: ActiveValue::Set(now),
                    deleted: ActiveValue::Set(false),
                    created_at: ActiveValue::Set(now),
                    modified_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;

                tracing::info!(transaction_id = header.id, user_id, "transaction created");
                Ok(Transaction::from((header, owner)))
            })
        })
        .await
    }

    pub async fn transaction(&self, transaction_id: i64) -> ResultEngine<Transaction> {
        let header = require_transaction(&self.database, transaction_id).await?;
        let mut found = transactions_with_users(&self.database, vec![header]).await?;
        found
            .pop()
            .ok_or(EngineError::TransactionNotFound(transaction_id))
    }

    /// Purchases of an active user, oldest first.
    pub async fn transaction_history(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> ResultEngine<Page<Transaction>> {
        let owner = require_user(&self.database, user_id).await?;
        let select =
            active::<transactions::Entity>().filter(transactions::Column::UserId.eq(user_id));
        let page = paginate(&self.database, select, page).await?;
        Ok(page.map(|header| Transaction::from((header, owner.clone()))))
    }

    pub async fn list_transactions(&self, page: PageRequest) -> ResultEngine<Page<Transaction>> {
        let mut page = paginate(&self.database, active::<transactions::Entity>(), page).await?;
        let headers = std::mem::take(&mut page.content);
        let content = transactions_with_users(&self.database, headers).await?;
        Ok(page.with_content(content))
    }

    /// Cancel a whole purchase.
    ///
    /// Every active item is voided (stock restored, owner refunded), the total
    /// drops to zero and the header is soft deleted.
    pub async fn delete_transaction(&self, transaction_id: i64) -> ResultEngine<()> {
        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let mut header = require_transaction_for_update(db_tx, transaction_id).await?;

                let items = active::<transaction_items::Entity>()
                    .filter(transaction_items::Column::TransactionId.eq(transaction_id))
                    .all(db_tx)
                    .await?;
                let voided = items.len();
                for item in items {
                    header = void_item(db_tx, item, header).await?;
                }

                if header.total_amount_minor != 0 {
                    tracing::warn!(
                        transaction_id,
                        total = header.total_amount_minor,
                        "running total did not match the voided items"
                    );
                    set_total(db_tx, header, 0).await?;
                }
                soft_delete::<transactions::Entity, _>(db_tx, transaction_id).await?;

                tracing::info!(transaction_id, voided, "transaction deleted");
                Ok(())
            })
        })
        .await
    }
}
