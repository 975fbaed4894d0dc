use axum::{
    Router, middleware,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{categories, i18n, payments, products, transactions, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/user/create", post(users::create))
        .route("/user/show", get(users::list))
        .route("/user/{id}", get(users::get))
        .route("/user/update/{id}", post(users::update))
        .route("/user/delete/{id}", get(users::delete))
        .route("/user/payment/deposit", post(payments::deposit))
        .route("/user/payment/withdraw", post(payments::withdraw))
        .route("/user/payment/transfer", post(payments::transfer))
        .route("/user/payment/history/{id}", get(payments::history))
        .route("/user/payment/balance/{id}", get(payments::balance))
        .route("/transaction/create", post(transactions::create))
        .route("/transaction/history/{id}", get(transactions::history))
        .route("/transaction/show", get(transactions::list))
        .route("/transaction/delete/{id}", get(transactions::delete))
        .route("/transaction/item/create", post(transactions::item_create))
        .route("/transaction/item/history/{id}", get(transactions::item_history))
        .route("/transaction/item/show", get(transactions::item_list))
        .route("/transaction/item/delete/{id}", get(transactions::item_delete))
        .route("/category/create", post(categories::create))
        .route("/category/show", get(categories::list))
        .route("/category/{id}", get(categories::get))
        .route("/category/update/{id}", post(categories::update))
        .route("/category/delete/{id}", get(categories::delete))
        .route("/product/create", post(products::create))
        .route("/product/show", get(products::list))
        .route("/product/{id}", get(products::get))
        .route("/product/update/{id}", post(products::update))
        .route("/product/delete/{id}", get(products::delete))
        .layer(middleware::from_fn(i18n::localize))
        .with_state(state)
}

/// The complete HTTP application around `engine`, ready to be served or
/// driven directly in tests.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
