use std::{future::Future, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{EngineError, Money, ResultEngine};

mod categories;
mod items;
mod payments;
mod products;
mod transactions;
mod users;

/// Future returned by a [`Engine::with_tx`] operation, borrowing the engine and
/// the open transaction.
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 'c>>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run `operation` inside one DB transaction, committing on `Ok` and
    /// rolling back on `Err`.
    ///
    /// Every query of the operation must go through the handle it receives.
    /// An in-memory SQLite pool has a single connection, so touching
    /// `self.database` from inside would wait forever.
    ///
    /// ```rust,ignore
    /// engine
    ///     .with_tx(|_, db_tx| Box::pin(async move { do_work(db_tx).await }))
    ///     .await?;
    /// ```
    pub async fn with_tx<T, F>(&self, operation: F) -> ResultEngine<T>
    where
        F: for<'c> FnOnce(&'c Engine, &'c DatabaseTransaction) -> TxFuture<'c, T>,
    {
        let db_tx = self.database.begin().await?;
        let result = operation(self, &db_tx).await;
        match result {
            Ok(value) => {
                db_tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = db_tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn ensure_positive_amount(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    Ok(())
}

fn ensure_positive(value: i64, label: &str) -> ResultEngine<()> {
    if value <= 0 {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be > 0, got {value}"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_names_are_trimmed() {
        assert_eq!(
            normalize_required_name("  alice ", "username").unwrap(),
            "alice"
        );
        assert_eq!(
            normalize_required_name("   ", "username"),
            Err(EngineError::InvalidInput(
                "username must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(ensure_positive_amount(Money::new(1)).is_ok());
        assert!(ensure_positive_amount(Money::ZERO).is_err());
        assert!(ensure_positive_amount(Money::new(-5)).is_err());
        assert!(ensure_positive(0, "count").is_err());
    }
}
