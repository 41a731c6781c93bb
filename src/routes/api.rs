//! Resource routes for clients, products and sales.

use crate::handlers::{clients, products, sales};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/:id",
            get(clients::read).put(clients::update).delete(clients::delete),
        )
        .route("/clients/:id/sales", get(clients::sales))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::read).put(products::update).delete(products::delete),
        )
        .route("/sales", get(sales::list).post(sales::create))
        .route(
            "/sales/:id",
            get(sales::read).put(sales::update).delete(sales::delete),
        )
        .with_state(state)
}
