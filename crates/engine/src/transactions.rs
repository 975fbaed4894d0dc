//! Purchase headers.
//!
//! A `Transaction` groups purchased items and keeps a running total that is
//! always equal to the sum of its non-deleted items.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, User, users};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub user: User,
    pub total_amount: Money,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub total_amount_minor: i64,
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
    #[sea_orm(has_many = "super::transaction_items::Entity")]
    Items,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn total_amount(&self) -> Money {
        Money::new(self.total_amount_minor)
    }
}

impl From<(Model, users::Model)> for Transaction {
    fn from((model, user): (Model, users::Model)) -> Self {
        Self {
            id: model.id,
            user: User::from(user),
            total_amount: model.total_amount(),
            date: model.date,
        }
    }
}
