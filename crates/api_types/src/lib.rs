//! Request and response bodies of the HTTP API.
//!
//! Money is always carried as signed integer minor units (`*_minor` fields).
//! Request bodies implement [`Validate`]: structural checks that run before any
//! domain logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A request body failed a structural check.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(())
}

fn positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    Ok(())
}

fn id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        return Err(ValidationError::new(field, "must be at least 1"));
    }
    Ok(())
}

fn any_supplied(supplied: &[bool]) -> Result<(), ValidationError> {
    if !supplied.iter().any(|s| *s) {
        return Err(ValidationError::new(
            "body",
            "at least one field must be supplied",
        ));
    }
    Ok(())
}

/// Error body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
}

pub mod page {
    use super::*;

    /// `?page=&size=` query string. Both are optional; `page` is 0-based.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct PageQuery {
        pub page: Option<u64>,
        pub size: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Page<T> {
        pub content: Vec<T>,
        pub page: u64,
        pub size: u64,
        pub total_elements: u64,
        pub total_pages: u64,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub full_name: String,
        /// Opening balance; defaults to 0.
        #[serde(default)]
        pub balance_minor: i64,
    }

    impl Validate for UserNew {
        fn validate(&self) -> Result<(), ValidationError> {
            not_blank("username", &self.username)?;
            not_blank("full_name", &self.full_name)?;
            if self.balance_minor < 0 {
                return Err(ValidationError::new("balance_minor", "must not be negative"));
            }
            Ok(())
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub username: Option<String>,
        pub full_name: Option<String>,
    }

    impl Validate for UserUpdate {
        fn validate(&self) -> Result<(), ValidationError> {
            any_supplied(&[self.username.is_some(), self.full_name.is_some()])?;
            if let Some(username) = &self.username {
                not_blank("username", username)?;
            }
            if let Some(full_name) = &self.full_name {
                not_blank("full_name", full_name)?;
            }
            Ok(())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i64,
        pub username: String,
        pub full_name: String,
        pub balance_minor: i64,
    }
}

pub mod payment {
    use super::*;
    use crate::user::UserView;

    /// Body of both deposit and withdraw.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub user_id: i64,
        /// Must be > 0.
        pub amount_minor: i64,
    }

    impl Validate for PaymentNew {
        fn validate(&self) -> Result<(), ValidationError> {
            id("user_id", self.user_id)?;
            positive("amount_minor", self.amount_minor)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_user_id: i64,
        pub to_user_id: i64,
        pub amount_minor: i64,
    }

    impl Validate for TransferNew {
        fn validate(&self) -> Result<(), ValidationError> {
            id("from_user_id", self.from_user_id)?;
            id("to_user_id", self.to_user_id)?;
            if self.from_user_id == self.to_user_id {
                return Err(ValidationError::new(
                    "to_user_id",
                    "must differ from from_user_id",
                ));
            }
            positive("amount_minor", self.amount_minor)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: i64,
        pub user: UserView,
        /// Signed: negative for withdrawals and outgoing transfers.
        pub amount_minor: i64,
        pub date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub user_id: i64,
        pub balance_minor: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub order: i64,
        #[serde(default)]
        pub description: String,
    }

    impl Validate for CategoryNew {
        fn validate(&self) -> Result<(), ValidationError> {
            not_blank("name", &self.name)?;
            positive("order", self.order)
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub order: Option<i64>,
        pub description: Option<String>,
    }

    impl Validate for CategoryUpdate {
        fn validate(&self) -> Result<(), ValidationError> {
            any_supplied(&[
                self.name.is_some(),
                self.order.is_some(),
                self.description.is_some(),
            ])?;
            if let Some(name) = &self.name {
                not_blank("name", name)?;
            }
            if let Some(order) = self.order {
                positive("order", order)?;
            }
            Ok(())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        pub order: i64,
        pub description: String,
    }
}

pub mod product {
    use super::*;
    use crate::category::CategoryView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub name: String,
        pub count: i64,
        pub category_id: i64,
    }

    impl Validate for ProductNew {
        fn validate(&self) -> Result<(), ValidationError> {
            not_blank("name", &self.name)?;
            positive("count", self.count)?;
            id("category_id", self.category_id)
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductUpdate {
        pub name: Option<String>,
        /// New stock level (restock).
        pub count: Option<i64>,
        pub category_id: Option<i64>,
    }

    impl Validate for ProductUpdate {
        fn validate(&self) -> Result<(), ValidationError> {
            any_supplied(&[
                self.name.is_some(),
                self.count.is_some(),
                self.category_id.is_some(),
            ])?;
            if let Some(name) = &self.name {
                not_blank("name", name)?;
            }
            if let Some(count) = self.count {
                positive("count", count)?;
            }
            if let Some(category_id) = self.category_id {
                id("category_id", category_id)?;
            }
            Ok(())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: i64,
        pub name: String,
        pub count: i64,
        pub category: CategoryView,
    }
}

pub mod transaction {
    use super::*;
    use crate::{product::ProductView, user::UserView};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub user_id: i64,
    }

    impl Validate for TransactionNew {
        fn validate(&self) -> Result<(), ValidationError> {
            id("user_id", self.user_id)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub user: UserView,
        pub total_amount_minor: i64,
        pub date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub product_id: i64,
        pub count: i64,
        /// Unit price.
        pub amount_minor: i64,
        pub transaction_id: i64,
    }

    impl Validate for ItemNew {
        fn validate(&self) -> Result<(), ValidationError> {
            id("product_id", self.product_id)?;
            positive("count", self.count)?;
            positive("amount_minor", self.amount_minor)?;
            id("transaction_id", self.transaction_id)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: i64,
        pub product: ProductView,
        pub count: i64,
        pub amount_minor: i64,
        pub total_amount_minor: i64,
        pub transaction: TransactionView,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        category::CategoryUpdate,
        payment::{PaymentNew, TransferNew},
        product::ProductNew,
        transaction::ItemNew,
        user::{UserNew, UserUpdate},
    };

    #[test]
    fn user_new_defaults_balance_and_rejects_blanks() {
        let body: UserNew =
            serde_json::from_str(r#"{"username":"alice","full_name":"Alice"}"#).unwrap();
        assert_eq!(body.balance_minor, 0);
        assert!(body.validate().is_ok());

        let blank = UserNew {
            username: "  ".to_string(),
            full_name: "Alice".to_string(),
            balance_minor: 0,
        };
        assert_eq!(blank.validate().unwrap_err().field, "username");

        let negative = UserNew {
            username: "alice".to_string(),
            full_name: "Alice".to_string(),
            balance_minor: -1,
        };
        assert_eq!(negative.validate().unwrap_err().field, "balance_minor");
    }

    #[test]
    fn updates_need_at_least_one_field() {
        assert!(UserUpdate::default().validate().is_err());
        assert!(CategoryUpdate::default().validate().is_err());

        let rename = UserUpdate {
            username: Some("bob".to_string()),
            full_name: None,
        };
        assert!(rename.validate().is_ok());

        let bad_order = CategoryUpdate {
            order: Some(0),
            ..Default::default()
        };
        assert_eq!(bad_order.validate().unwrap_err().field, "order");
    }

    #[test]
    fn amounts_and_ids_must_be_positive() {
        let zero = PaymentNew {
            user_id: 1,
            amount_minor: 0,
        };
        assert_eq!(zero.validate().unwrap_err().field, "amount_minor");

        let no_user = PaymentNew {
            user_id: 0,
            amount_minor: 100,
        };
        assert_eq!(no_user.validate().unwrap_err().field, "user_id");

        let item = ItemNew {
            product_id: 1,
            count: 0,
            amount_minor: 100,
            transaction_id: 1,
        };
        assert_eq!(item.validate().unwrap_err().field, "count");

        let product = ProductNew {
            name: "Tea".to_string(),
            count: 3,
            category_id: 0,
        };
        assert_eq!(product.validate().unwrap_err().field, "category_id");
    }

    #[test]
    fn transfer_to_self_is_rejected() {
        let body = TransferNew {
            from_user_id: 4,
            to_user_id: 4,
            amount_minor: 100,
        };
        let err = body.validate().unwrap_err();
        assert_eq!(err.field, "to_user_id");
        assert_eq!(err.to_string(), "to_user_id: must differ from from_user_id");
    }
}
