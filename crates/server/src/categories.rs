//! Category endpoints.

use api_types::{
    category::{CategoryNew, CategoryUpdate, CategoryView},
    page::Page,
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Category, NewCategory};

use crate::{
    ServerError,
    extract::{Id, Paging, ValidatedJson},
    page_view,
    server::ServerState,
};

pub(crate) fn map_category(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        order: category.order,
        description: category.description,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<CategoryNew>,
) -> Result<Json<CategoryView>, ServerError> {
    let cmd = NewCategory::new(payload.name, payload.order).description(payload.description);
    let category = state.engine.create_category(cmd).await?;
    Ok(Json(map_category(category)))
}

pub async fn list(
    State(state): State<ServerState>,
    Paging(page): Paging,
) -> Result<Json<Page<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(page).await?;
    Ok(Json(page_view(categories, map_category)))
}

pub async fn get(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(id).await?;
    Ok(Json(map_category(category)))
}

pub async fn update(
    State(state): State<ServerState>,
    Id(id): Id,
    ValidatedJson(payload): ValidatedJson<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let cmd = engine::CategoryUpdate {
        name: payload.name,
        order: payload.order,
        description: payload.description,
    };
    let category = state.engine.update_category(id, cmd).await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(StatusCode::OK)
}
