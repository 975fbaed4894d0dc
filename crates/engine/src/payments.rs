//! Append-only payment ledger.
//!
//! One row per balance change caused by a deposit, a withdrawal or one leg of
//! a transfer. Rows are never updated after insertion.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, User, users};

/// A ledger entry together with a snapshot of its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentTransaction {
    pub id: i64,
    pub user: User,
    /// Signed amount: positive for incoming money, negative for outgoing.
    pub amount: Money,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_payment_transaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub amount_minor: i64,
    pub date: DateTimeUtc,
    pub deleted: bool,
    pub created_at: DateTimeUtc,
    pub modified_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, users::Model)> for PaymentTransaction {
    fn from((model, user): (Model, users::Model)) -> Self {
        Self {
            id: model.id,
            user: User::from(user),
            amount: Money::new(model.amount_minor),
            date: model.date,
        }
    }
}
