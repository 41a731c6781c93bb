//! OpenAPI document for the resource routes.

use crate::dto::{ClientDto, ProductDto, SalesDto};
use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::{clients, products, sales};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        clients::list,
        clients::read,
        clients::sales,
        clients::create,
        clients::update,
        clients::delete,
        products::list,
        products::read,
        products::create,
        products::update,
        products::delete,
        sales::list,
        sales::read,
        sales::create,
        sales::update,
        sales::delete
    ),
    components(schemas(ClientDto, ProductDto, SalesDto, ErrorBody, ErrorDetail)),
    tags(
        (name = "clients", description = "Clients and their sales"),
        (name = "products", description = "Product catalogue"),
        (name = "sales", description = "Client to product sales")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api-docs/openapi.json
pub fn openapi_routes() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
