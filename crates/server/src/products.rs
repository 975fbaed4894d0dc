//! Product endpoints.

use api_types::{
    page::Page,
    product::{ProductNew, ProductUpdate, ProductView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{NewProduct, Product};

use crate::{
    ServerError,
    categories::map_category,
    extract::{Id, Paging, ValidatedJson},
    page_view,
    server::ServerState,
};

pub(crate) fn map_product(product: Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        count: product.count,
        category: map_category(product.category),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<ProductNew>,
) -> Result<Json<ProductView>, ServerError> {
    let cmd = NewProduct::new(payload.name, payload.count, payload.category_id);
    let product = state.engine.create_product(cmd).await?;
    Ok(Json(map_product(product)))
}

pub async fn list(
    State(state): State<ServerState>,
    Paging(page): Paging,
) -> Result<Json<Page<ProductView>>, ServerError> {
    let products = state.engine.list_products(page).await?;
    Ok(Json(page_view(products, map_product)))
}

pub async fn get(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<Json<ProductView>, ServerError> {
    let product = state.engine.product(id).await?;
    Ok(Json(map_product(product)))
}

pub async fn update(
    State(state): State<ServerState>,
    Id(id): Id,
    ValidatedJson(payload): ValidatedJson<ProductUpdate>,
) -> Result<Json<ProductView>, ServerError> {
    let cmd = engine::ProductUpdate {
        name: payload.name,
        count: payload.count,
        category_id: payload.category_id,
    };
    let product = state.engine.update_product(id, cmd).await?;
    Ok(Json(map_product(product)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_product(id).await?;
    Ok(StatusCode::OK)
}
