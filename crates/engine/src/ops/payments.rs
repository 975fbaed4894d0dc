use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, QueryFilter};

use crate::{
    EngineError, Money, Page, PageRequest, PaymentTransaction, ResultEngine, TransferCmd,
    payments,
    repository::{active, paginate},
    users,
};

use super::{
    Engine, ensure_positive_amount,
    users::{require_user, require_user_for_update, set_balance},
};

/// Append one signed entry to the payment ledger.
async fn record_entry<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    amount: Money,
) -> ResultEngine<payments::Model> {
    let now = Utc::now();
    let entry = payments::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        amount_minor: ActiveValue::Set(amount.minor()),
        date: ActiveValue::Set(now),
        deleted: ActiveValue::Set(false),
        created_at: ActiveValue::Set(now),
        modified_at: ActiveValue::Set(now),
        ..Default::default()
    };
    Ok(entry.insert(db).await?)
}

pub(super) fn insufficient_balance(user: &users::Model, amount: Money) -> EngineError {
    EngineError::InsufficientBalance(format!(
        "user {} has {}, needs {amount}",
        user.id,
        user.balance()
    ))
}

impl Engine {
    /// Add `amount` to the user's balance and record a `+amount` entry.
    pub async fn deposit(&self, user_id: i64, amount: Money) -> ResultEngine<PaymentTransaction> {
        ensure_positive_amount(amount)?;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let user = require_user_for_update(db_tx, user_id).await?;
                let balance = user.balance().checked_add(amount)?;
                let user = set_balance(db_tx, user, balance.minor()).await?;
                let entry = record_entry(db_tx, user_id, amount).await?;

                tracing::info!(user_id, amount = %amount, balance = %balance, "deposit");
                Ok(PaymentTransaction::from((entry, user)))
            })
        })
        .await
    }

    /// Take `amount` from the user's balance and record a `-amount` entry.
    ///
    /// The balance never goes negative: a withdrawal larger than the balance
    /// fails with [`EngineError::InsufficientBalance`] and changes nothing.
    pub async fn withdraw(&self, user_id: i64, amount: Money) -> ResultEngine<PaymentTransaction> {
        ensure_positive_amount(amount)?;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let user = require_user_for_update(db_tx, user_id).await?;
                if user.balance() < amount {
                    return Err(insufficient_balance(&user, amount));
                }
                let balance = user.balance().checked_sub(amount)?;
                let user = set_balance(db_tx, user, balance.minor()).await?;
                let entry = record_entry(db_tx, user_id, -amount).await?;

                tracing::info!(user_id, amount = %amount, balance = %balance, "withdraw");
                Ok(PaymentTransaction::from((entry, user)))
            })
        })
        .await
    }

    /// Move money from one user to another.
    ///
    /// Writes two ledger entries (`-amount` on the source, `+amount` on the
    /// destination) and returns the source one.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<PaymentTransaction> {
        let TransferCmd {
            from_user_id,
            to_user_id,
            amount,
        } = cmd;
        if from_user_id == to_user_id {
            return Err(EngineError::InvalidInput(
                "cannot transfer to the same user".to_string(),
            ));
        }
        ensure_positive_amount(amount)?;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                // Lock in id order.
                let (source, destination) = if from_user_id < to_user_id {
                    let source = require_user_for_update(db_tx, from_user_id).await?;
                    let destination = require_user_for_update(db_tx, to_user_id).await?;
                    (source, destination)
                } else {
                    let destination = require_user_for_update(db_tx, to_user_id).await?;
                    let source = require_user_for_update(db_tx, from_user_id).await?;
                    (source, destination)
                };

                if source.balance() < amount {
                    return Err(insufficient_balance(&source, amount));
                }
                let source_balance = source.balance().checked_sub(amount)?;
                let destination_balance = destination.balance().checked_add(amount)?;

                let source = set_balance(db_tx, source, source_balance.minor()).await?;
                set_balance(db_tx, destination, destination_balance.minor()).await?;

                let entry = record_entry(db_tx, from_user_id, -amount).await?;
                record_entry(db_tx, to_user_id, amount).await?;

                tracing::info!(from_user_id, to_user_id, amount = %amount, "transfer");
                Ok(PaymentTransaction::from((entry, source)))
            })
        })
        .await
    }

    /// Ledger entries of an active user, oldest first.
    pub async fn payment_history(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> ResultEngine<Page<PaymentTransaction>> {
        let user = require_user(&self.database, user_id).await?;
        let select = active::<payments::Entity>().filter(payments::Column::UserId.eq(user_id));
        let page = paginate(&self.database, select, page).await?;
        Ok(page.map(|entry| PaymentTransaction::from((entry, user.clone()))))
    }

    pub async fn check_balance(&self, user_id: i64) -> ResultEngine<Money> {
        let user = require_user(&self.database, user_id).await?;
        Ok(user.balance())
    }
}
