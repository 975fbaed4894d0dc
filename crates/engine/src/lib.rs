//! Ledger engine for users, balances and purchases.
//!
//! The engine owns every business rule: balance changes, the append-only
//! payment ledger, inventory accounting and purchase totals. All state lives in
//! the database; the [`Engine`] itself only holds the connection.
//!
//! Rows are soft deleted: a deleted row is invisible to every lookup and list
//! and behaves exactly like a missing one.

pub use categories::Category;
pub use commands::{
    AddItemCmd, CategoryUpdate, NewCategory, NewProduct, NewUser, ProductUpdate, TransferCmd,
    UserUpdate,
};
pub use error::{EngineError, ErrorCode};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, TxFuture};
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest};
pub use payments::PaymentTransaction;
pub use products::Product;
pub use transaction_items::TransactionItem;
pub use transactions::Transaction;
pub use users::User;

mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod page;
mod payments;
mod products;
mod repository;
mod transaction_items;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
