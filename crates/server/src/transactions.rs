//! Purchase endpoints: headers under `/transaction`, lines under
//! `/transaction/item`.

use api_types::{
    page::Page,
    transaction::{ItemNew, ItemView, TransactionNew, TransactionView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{AddItemCmd, Money, Transaction, TransactionItem};

use crate::{
    ServerError,
    extract::{Id, Paging, ValidatedJson},
    page_view,
    products::map_product,
    server::ServerState,
    users::map_user,
};

fn map_transaction(transaction: Transaction) -> TransactionView {
    TransactionView {
        id: transaction.id,
        user: map_user(transaction.user),
        total_amount_minor: transaction.total_amount.minor(),
        date: transaction.date,
    }
}

fn map_item(item: TransactionItem) -> ItemView {
    ItemView {
        id: item.id,
        product: map_product(item.product),
        count: item.count,
        amount_minor: item.amount.minor(),
        total_amount_minor: item.total_amount.minor(),
        transaction: map_transaction(item.transaction),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<TransactionNew>,
) -> Result<Json<TransactionView>, ServerError> {
    let transaction = state.engine.create_transaction(payload.user_id).await?;
    Ok(Json(map_transaction(transaction)))
}

pub async fn history(
    State(state): State<ServerState>,
    Id(user_id): Id,
    Paging(page): Paging,
) -> Result<Json<Page<TransactionView>>, ServerError> {
    let transactions = state.engine.transaction_history(user_id, page).await?;
    Ok(Json(page_view(transactions, map_transaction)))
}

pub async fn list(
    State(state): State<ServerState>,
    Paging(page): Paging,
) -> Result<Json<Page<TransactionView>>, ServerError> {
    let transactions = state.engine.list_transactions(page).await?;
    Ok(Json(page_view(transactions, map_transaction)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::OK)
}

pub async fn item_create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<ItemNew>,
) -> Result<Json<ItemView>, ServerError> {
    let cmd = AddItemCmd::new(
        payload.transaction_id,
        payload.product_id,
        payload.count,
        Money::new(payload.amount_minor),
    );
    let item = state.engine.add_item(cmd).await?;
    Ok(Json(map_item(item)))
}

pub async fn item_history(
    State(state): State<ServerState>,
    Id(transaction_id): Id,
    Paging(page): Paging,
) -> Result<Json<Page<ItemView>>, ServerError> {
    let items = state
        .engine
        .items_by_transaction(transaction_id, page)
        .await?;
    Ok(Json(page_view(items, map_item)))
}

pub async fn item_list(
    State(state): State<ServerState>,
    Paging(page): Paging,
) -> Result<Json<Page<ItemView>>, ServerError> {
    let items = state.engine.list_items(page).await?;
    Ok(Json(page_view(items, map_item)))
}

pub async fn item_delete(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_item(id).await?;
    Ok(StatusCode::OK)
}
