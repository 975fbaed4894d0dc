//! The module contains the error the engine can throw.
//!
//! Every domain error carries a stable [`ErrorCode`]: a numeric code plus a
//! tag used by callers to look up a localized message. The engine itself
//! never localizes anything; the `Display` output is a plain English
//! template meant for logs.
//!
//! Not-found and soft-deleted rows are reported identically.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("user \"{0}\" already exists")]
    UserAlreadyExists(String),
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),
    #[error("transaction {0} not found")]
    TransactionNotFound(i64),
    #[error("transaction item {0} not found")]
    TransactionItemNotFound(i64),
    #[error("product {0} not found")]
    ProductNotFound(i64),
    #[error("product \"{0}\" already exists")]
    ProductAlreadyExists(String),
    #[error("category {0} not found")]
    CategoryNotFound(i64),
    #[error("category \"{0}\" already exists")]
    CategoryAlreadyExists(String),
    #[error("category {0} is still referenced by active products")]
    CategoryInUse(i64),
    #[error("not enough items in stock: {0}")]
    InsufficientInventory(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Stable identifier of an error kind.
///
/// Codes and tags are part of the public HTTP contract and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UserAlreadyExists,
    UserNotFound,
    UserHasInsufficientBalance,
    TransactionNotFound,
    ProductNotFound,
    ProductAlreadyExists,
    CategoryNotFound,
    CategoryAlreadyExists,
    CountNotEnough,
    CategoryInUse,
    TransactionItemNotFound,
    ValidationFailed,
    InternalError,
}

impl ErrorCode {
    pub const fn code(self) -> i32 {
        match self {
            Self::UserAlreadyExists => 100,
            Self::UserNotFound => 101,
            Self::UserHasInsufficientBalance => 102,
            Self::TransactionNotFound => 103,
            Self::ProductNotFound => 104,
            Self::ProductAlreadyExists => 105,
            Self::CategoryNotFound => 106,
            Self::CategoryAlreadyExists => 107,
            Self::CountNotEnough => 108,
            Self::CategoryInUse => 109,
            Self::TransactionItemNotFound => 110,
            Self::ValidationFailed => 400,
            Self::InternalError => 500,
        }
    }

    /// Tag used as the lookup key for message catalogs.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserHasInsufficientBalance => "USER_HAS_INSUFFICIENT_BALANCE",
            Self::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::ProductAlreadyExists => "PRODUCT_ALREADY_EXISTS",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::CategoryAlreadyExists => "CATEGORY_ALREADY_EXISTS",
            Self::CountNotEnough => "COUNT_NOT_ENOUGH",
            Self::CategoryInUse => "CATEGORY_IN_USE",
            Self::TransactionItemNotFound => "TRANSACTION_ITEM_NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl EngineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserAlreadyExists(_) => ErrorCode::UserAlreadyExists,
            Self::UserNotFound(_) => ErrorCode::UserNotFound,
            Self::InsufficientBalance(_) => ErrorCode::UserHasInsufficientBalance,
            Self::TransactionNotFound(_) => ErrorCode::TransactionNotFound,
            Self::TransactionItemNotFound(_) => ErrorCode::TransactionItemNotFound,
            Self::ProductNotFound(_) => ErrorCode::ProductNotFound,
            Self::ProductAlreadyExists(_) => ErrorCode::ProductAlreadyExists,
            Self::CategoryNotFound(_) => ErrorCode::CategoryNotFound,
            Self::CategoryAlreadyExists(_) => ErrorCode::CategoryAlreadyExists,
            Self::CategoryInUse(_) => ErrorCode::CategoryInUse,
            Self::InsufficientInventory(_) => ErrorCode::CountNotEnough,
            Self::InvalidInput(_) | Self::InvalidAmount(_) => ErrorCode::ValidationFailed,
            Self::Database(_) => ErrorCode::InternalError,
        }
    }

    /// `true` for errors caused by the caller's input (domain or validation),
    /// `false` for store failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists(a), Self::UserAlreadyExists(b)) => a == b,
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::TransactionNotFound(a), Self::TransactionNotFound(b)) => a == b,
            (Self::TransactionItemNotFound(a), Self::TransactionItemNotFound(b)) => a == b,
            (Self::ProductNotFound(a), Self::ProductNotFound(b)) => a == b,
            (Self::ProductAlreadyExists(a), Self::ProductAlreadyExists(b)) => a == b,
            (Self::CategoryNotFound(a), Self::CategoryNotFound(b)) => a == b,
            (Self::CategoryAlreadyExists(a), Self::CategoryAlreadyExists(b)) => a == b,
            (Self::CategoryInUse(a), Self::CategoryInUse(b)) => a == b,
            (Self::InsufficientInventory(a), Self::InsufficientInventory(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(EngineError::UserAlreadyExists("a".into()).code().code(), 100);
        assert_eq!(EngineError::UserNotFound(1).code().code(), 101);
        assert_eq!(EngineError::InsufficientBalance("x".into()).code().code(), 102);
        assert_eq!(EngineError::TransactionNotFound(1).code().code(), 103);
        assert_eq!(EngineError::ProductNotFound(1).code().code(), 104);
        assert_eq!(EngineError::ProductAlreadyExists("p".into()).code().code(), 105);
        assert_eq!(EngineError::CategoryNotFound(1).code().code(), 106);
        assert_eq!(EngineError::CategoryAlreadyExists("c".into()).code().code(), 107);
        assert_eq!(EngineError::InsufficientInventory("x".into()).code().code(), 108);
    }

    #[test]
    fn validation_errors_share_one_class() {
        assert_eq!(
            EngineError::InvalidInput("blank".into()).code(),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            EngineError::InvalidAmount("overflow".into()).code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn database_errors_are_not_client_errors() {
        let err = EngineError::Database(DbErr::Custom("boom".into()));
        assert!(!err.is_client_error());
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(EngineError::UserNotFound(3).is_client_error());
    }
}
