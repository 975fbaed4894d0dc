//! Command structs for engine write operations.
//!
//! Update commands carry `Option` fields: only the supplied ones are applied.

use crate::Money;

/// Register a user.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub balance: Money,
}

impl NewUser {
    /// A user starting with a zero balance.
    #[must_use]
    pub fn new(username: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            balance: Money::ZERO,
        }
    }

    #[must_use]
    pub fn balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub full_name: Option<String>,
}

impl UserUpdate {
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.full_name.is_none()
    }
}

/// Move money between two users.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub amount: Money,
}

impl TransferCmd {
    #[must_use]
    pub fn new(from_user_id: i64, to_user_id: i64, amount: Money) -> Self {
        Self {
            from_user_id,
            to_user_id,
            amount,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub order: i64,
    pub description: String,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self {
            name: name.into(),
            order,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub order: Option<i64>,
    pub description: Option<String>,
}

impl CategoryUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.order.is_none() && self.description.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub count: i64,
    pub category_id: i64,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, count: i64, category_id: i64) -> Self {
        Self {
            name: name.into(),
            count,
            category_id,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub count: Option<i64>,
    pub category_id: Option<i64>,
}

impl ProductUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stock level directly (restock).
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.count.is_none() && self.category_id.is_none()
    }
}

/// Buy `count` units of a product at `amount` each, inside an existing
/// purchase.
#[derive(Clone, Debug)]
pub struct AddItemCmd {
    pub transaction_id: i64,
    pub product_id: i64,
    pub count: i64,
    pub amount: Money,
}

impl AddItemCmd {
    #[must_use]
    pub fn new(transaction_id: i64, product_id: i64, count: i64, amount: Money) -> Self {
        Self {
            transaction_id,
            product_id,
            count,
            amount,
        }
    }
}
