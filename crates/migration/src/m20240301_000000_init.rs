//! Initial schema migration.
//!
//! Creates the complete ledger schema:
//!
//! - `users`: account holders and their balance
//! - `user_payment_transaction`: append-only balance ledger (deposit/withdraw/transfer legs)
//! - `category`: product categories
//! - `product`: inventory
//! - `transaction`: purchase headers with a running total
//! - `transaction_item`: purchased lines
//!
//! Every table carries a `deleted` flag (soft delete) and audit timestamps.
//! Name uniqueness only holds among non-deleted rows, so it is enforced by the
//! engine rather than by unique indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    FullName,
    BalanceMinor,
    Deleted,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum UserPaymentTransaction {
    Table,
    Id,
    UserId,
    AmountMinor,
    Date,
    Deleted,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
    Name,
    Orders,
    Description,
    Deleted,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum Product {
    Table,
    Id,
    Name,
    Count,
    CategoryId,
    Deleted,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum Transaction {
    Table,
    Id,
    UserId,
    TotalAmountMinor,
    Date,
    Deleted,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum TransactionItem {
    Table,
    Id,
    ProductId,
    Count,
    AmountMinor,
    TotalAmountMinor,
    TransactionId,
    Deleted,
    CreatedAt,
    ModifiedAt,
}

/// Columns shared by every table: soft-delete flag and audit timestamps.
fn audit_columns<T: Iden + 'static>(
    table: &mut TableCreateStatement,
    deleted: T,
    created_at: T,
    modified_at: T,
) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(deleted)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(created_at).timestamp().not_null())
        .col(ColumnDef::new(modified_at).timestamp().not_null())
}

fn id_column<T: Iden + 'static>(id: T) -> ColumnDef {
    ColumnDef::new(id)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        let mut users = Table::create();
        users
            .table(Users::Table)
            .if_not_exists()
            .col(&mut id_column(Users::Id))
            .col(ColumnDef::new(Users::Username).string().not_null())
            .col(ColumnDef::new(Users::FullName).string().not_null())
            .col(
                ColumnDef::new(Users::BalanceMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            );
        audit_columns(&mut users, Users::Deleted, Users::CreatedAt, Users::ModifiedAt);
        manager.create_table(users.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Payment ledger
        // ───────────────────────────────────────────────────────────────────
        let mut payments = Table::create();
        payments
            .table(UserPaymentTransaction::Table)
            .if_not_exists()
            .col(&mut id_column(UserPaymentTransaction::Id))
            .col(
                ColumnDef::new(UserPaymentTransaction::UserId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(UserPaymentTransaction::AmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(UserPaymentTransaction::Date)
                    .timestamp()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-user_payment_transaction-user_id")
                    .from(UserPaymentTransaction::Table, UserPaymentTransaction::UserId)
                    .to(Users::Table, Users::Id),
            );
        audit_columns(
            &mut payments,
            UserPaymentTransaction::Deleted,
            UserPaymentTransaction::CreatedAt,
            UserPaymentTransaction::ModifiedAt,
        );
        manager.create_table(payments.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_payment_transaction-user_id")
                    .table(UserPaymentTransaction::Table)
                    .col(UserPaymentTransaction::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Categories
        // ───────────────────────────────────────────────────────────────────
        let mut categories = Table::create();
        categories
            .table(Category::Table)
            .if_not_exists()
            .col(&mut id_column(Category::Id))
            .col(ColumnDef::new(Category::Name).string().not_null())
            .col(ColumnDef::new(Category::Orders).big_integer().not_null())
            .col(
                ColumnDef::new(Category::Description)
                    .string()
                    .not_null()
                    .default(""),
            );
        audit_columns(
            &mut categories,
            Category::Deleted,
            Category::CreatedAt,
            Category::ModifiedAt,
        );
        manager.create_table(categories.to_owned()).await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Products
        // ───────────────────────────────────────────────────────────────────
        let mut products = Table::create();
        products
            .table(Product::Table)
            .if_not_exists()
            .col(&mut id_column(Product::Id))
            .col(ColumnDef::new(Product::Name).string().not_null())
            .col(ColumnDef::new(Product::Count).big_integer().not_null())
            .col(ColumnDef::new(Product::CategoryId).big_integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-product-category_id")
                    .from(Product::Table, Product::CategoryId)
                    .to(Category::Table, Category::Id),
            );
        audit_columns(
            &mut products,
            Product::Deleted,
            Product::CreatedAt,
            Product::ModifiedAt,
        );
        manager.create_table(products.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-product-category_id")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Purchase headers
        // ───────────────────────────────────────────────────────────────────
        let mut transactions = Table::create();
        transactions
            .table(Transaction::Table)
            .if_not_exists()
            .col(&mut id_column(Transaction::Id))
            .col(ColumnDef::new(Transaction::UserId).big_integer().not_null())
            .col(
                ColumnDef::new(Transaction::TotalAmountMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(Transaction::Date).timestamp().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transaction-user_id")
                    .from(Transaction::Table, Transaction::UserId)
                    .to(Users::Table, Users::Id),
            );
        audit_columns(
            &mut transactions,
            Transaction::Deleted,
            Transaction::CreatedAt,
            Transaction::ModifiedAt,
        );
        manager.create_table(transactions.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction-user_id")
                    .table(Transaction::Table)
                    .col(Transaction::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Purchase items
        // ───────────────────────────────────────────────────────────────────
        let mut items = Table::create();
        items
            .table(TransactionItem::Table)
            .if_not_exists()
            .col(&mut id_column(TransactionItem::Id))
            .col(
                ColumnDef::new(TransactionItem::ProductId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(TransactionItem::Count).big_integer().not_null())
            .col(
                ColumnDef::new(TransactionItem::AmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TransactionItem::TotalAmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TransactionItem::TransactionId)
                    .big_integer()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transaction_item-product_id")
                    .from(TransactionItem::Table, TransactionItem::ProductId)
                    .to(Product::Table, Product::Id),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transaction_item-transaction_id")
                    .from(TransactionItem::Table, TransactionItem::TransactionId)
                    .to(Transaction::Table, Transaction::Id),
            );
        audit_columns(
            &mut items,
            TransactionItem::Deleted,
            TransactionItem::CreatedAt,
            TransactionItem::ModifiedAt,
        );
        manager.create_table(items.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction_item-transaction_id")
                    .table(TransactionItem::Table)
                    .col(TransactionItem::TransactionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(TransactionItem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserPaymentTransaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
