//! Deposit, withdraw and transfer endpoints plus the user's ledger.

use api_types::{
    page::Page,
    payment::{BalanceView, PaymentNew, PaymentView, TransferNew},
};
use axum::{Json, extract::State};
use engine::{Money, PaymentTransaction, TransferCmd};

use crate::{
    ServerError,
    extract::{Id, Paging, ValidatedJson},
    page_view,
    server::ServerState,
    users::map_user,
};

fn map_payment(entry: PaymentTransaction) -> PaymentView {
    PaymentView {
        id: entry.id,
        user: map_user(entry.user),
        amount_minor: entry.amount.minor(),
        date: entry.date,
    }
}

pub async fn deposit(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<PaymentNew>,
) -> Result<Json<PaymentView>, ServerError> {
    let entry = state
        .engine
        .deposit(payload.user_id, Money::new(payload.amount_minor))
        .await?;
    Ok(Json(map_payment(entry)))
}

pub async fn withdraw(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<PaymentNew>,
) -> Result<Json<PaymentView>, ServerError> {
    let entry = state
        .engine
        .withdraw(payload.user_id, Money::new(payload.amount_minor))
        .await?;
    Ok(Json(map_payment(entry)))
}

pub async fn transfer(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<TransferNew>,
) -> Result<Json<PaymentView>, ServerError> {
    let cmd = TransferCmd::new(
        payload.from_user_id,
        payload.to_user_id,
        Money::new(payload.amount_minor),
    );
    let entry = state.engine.transfer(cmd).await?;
    Ok(Json(map_payment(entry)))
}

pub async fn history(
    State(state): State<ServerState>,
    Id(user_id): Id,
    Paging(page): Paging,
) -> Result<Json<Page<PaymentView>>, ServerError> {
    let entries = state.engine.payment_history(user_id, page).await?;
    Ok(Json(page_view(entries, map_payment)))
}

pub async fn balance(
    State(state): State<ServerState>,
    Id(user_id): Id,
) -> Result<Json<BalanceView>, ServerError> {
    let balance = state.engine.check_balance(user_id).await?;
    Ok(Json(BalanceView {
        user_id,
        balance_minor: balance.minor(),
    }))
}
