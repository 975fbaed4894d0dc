//! User endpoints.

use api_types::{
    page::Page,
    user::{UserNew, UserUpdate, UserView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Money, NewUser, User};

use crate::{
    ServerError,
    extract::{Id, Paging, ValidatedJson},
    page_view,
    server::ServerState,
};

pub(crate) fn map_user(user: User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        balance_minor: user.balance.minor(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<UserNew>,
) -> Result<StatusCode, ServerError> {
    let cmd = NewUser::new(payload.username, payload.full_name)
        .balance(Money::new(payload.balance_minor));
    state.engine.create_user(cmd).await?;
    Ok(StatusCode::OK)
}

pub async fn list(
    State(state): State<ServerState>,
    Paging(page): Paging,
) -> Result<Json<Page<UserView>>, ServerError> {
    let users = state.engine.list_users(page).await?;
    Ok(Json(page_view(users, map_user)))
}

pub async fn get(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(id).await?;
    Ok(Json(map_user(user)))
}

pub async fn update(
    State(state): State<ServerState>,
    Id(id): Id,
    ValidatedJson(payload): ValidatedJson<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let cmd = engine::UserUpdate {
        username: payload.username,
        full_name: payload.full_name,
    };
    let user = state.engine.update_user(id, cmd).await?;
    Ok(Json(map_user(user)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(id).await?;
    Ok(StatusCode::OK)
}
