//! Soft-delete aware queries shared by every entity.
//!
//! Every lookup and list goes through [`active`], the single "not deleted"
//! predicate. Rows are never physically removed.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, sea_query::Expr,
};

use crate::{
    Page, PageRequest, ResultEngine, categories, payments, products, transaction_items,
    transactions, users,
};

/// Entities carrying the `deleted` flag and audit columns.
pub(crate) trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_column() -> Self::Column;
    fn modified_at_column() -> Self::Column;
    fn model_id(model: &Self::Model) -> i64;
}

macro_rules! impl_soft_delete {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDelete for $module::Entity {
                fn id_column() -> Self::Column {
                    $module::Column::Id
                }

                fn deleted_column() -> Self::Column {
                    $module::Column::Deleted
                }

                fn modified_at_column() -> Self::Column {
                    $module::Column::ModifiedAt
                }

                fn model_id(model: &Self::Model) -> i64 {
                    model.id
                }
            }
        )+
    };
}

impl_soft_delete!(
    users,
    payments,
    categories,
    products,
    transactions,
    transaction_items
);

/// Non-deleted rows, ordered by id.
pub(crate) fn active<E: SoftDelete>() -> Select<E> {
    E::find()
        .filter(E::deleted_column().eq(false))
        .order_by_asc(E::id_column())
}

pub(crate) async fn find_active<E, C>(db: &C, id: i64) -> ResultEngine<Option<E::Model>>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    Ok(active::<E>().filter(E::id_column().eq(id)).one(db).await?)
}

/// Like [`find_active`], but asks the backend for an exclusive row lock.
///
/// SQLite has no row locks and serializes writers instead; the clause is
/// dropped by its query builder.
pub(crate) async fn find_active_for_update<E, C>(
    db: &C,
    id: i64,
) -> ResultEngine<Option<E::Model>>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    Ok(active::<E>()
        .filter(E::id_column().eq(id))
        .lock_exclusive()
        .one(db)
        .await?)
}

pub(crate) async fn list_active<E, C>(db: &C) -> ResultEngine<Vec<E::Model>>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    Ok(active::<E>().all(db).await?)
}

/// Runs `select` one page at a time. Callers pass an [`active`] query,
/// optionally narrowed with extra filters.
pub(crate) async fn paginate<E, C>(
    db: &C,
    select: Select<E>,
    request: PageRequest,
) -> ResultEngine<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
    C: ConnectionTrait,
{
    let paginator = select.paginate(db, request.size);
    let totals = paginator.num_items_and_pages().await?;
    let content = paginator.fetch_page(request.page).await?;
    Ok(Page {
        content,
        page: request.page,
        size: request.size,
        total_elements: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}

/// Marks the row deleted and bumps `modified_at`.
///
/// Returns `false` when no active row has that id.
pub(crate) async fn soft_delete<E, C>(db: &C, id: i64) -> ResultEngine<bool>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::deleted_column(), Expr::value(true))
        .col_expr(E::modified_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_column().eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// `true` if an active row other than `exclude` already uses `name` in `column`.
pub(crate) async fn name_taken<E, C>(
    db: &C,
    column: E::Column,
    name: &str,
    exclude: Option<i64>,
) -> ResultEngine<bool>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let mut query = active::<E>().filter(column.eq(name));
    if let Some(id) = exclude {
        query = query.filter(E::id_column().ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Loads rows by id regardless of the deleted flag, keyed by id.
///
/// Used to attach related snapshots (owner, category, ...) to listed rows.
pub(crate) async fn load_by_ids<E, C>(
    db: &C,
    ids: impl IntoIterator<Item = i64>,
) -> ResultEngine<HashMap<i64, E::Model>>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = E::find()
        .filter(E::id_column().is_in(ids))
        .all(db)
        .await?;
    Ok(models
        .into_iter()
        .map(|model| (E::model_id(&model), model))
        .collect())
}
