//! Purchased lines of a [`Transaction`](crate::Transaction).

use sea_orm::entity::prelude::*;

use crate::{Money, Product, Transaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionItem {
    pub id: i64,
    pub product: Product,
    pub count: i64,
    /// Unit price.
    pub amount: Money,
    /// `count * amount`.
    pub total_amount: Money,
    pub transaction: Transaction,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub count: i64,
    pub amount_minor: i64,
    pub total_amount_minor: i64,
    pub transaction_id: i64,
    pub deleted: bool,
    pub created_at: DateTimeUtc,
    pub modified_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Transaction,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn total_amount(&self) -> Money {
        Money::new(self.total_amount_minor)
    }
}

impl From<(Model, Product, Transaction)> for TransactionItem {
    fn from((model, product, transaction): (Model, Product, Transaction)) -> Self {
        Self {
            id: model.id,
            total_amount: model.total_amount(),
            amount: Money::new(model.amount_minor),
            count: model.count,
            product,
            transaction,
        }
    }
}
