//! /products handlers.

use crate::dto::ProductDto;
use crate::entity::Product;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

async fn find(state: &AppState, id: i32) -> Result<Product, AppError> {
    state
        .products
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", id)))
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses((status = 200, description = "All products", body = Vec<ProductDto>))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductDto>>, AppError> {
    let products = state.products.get_all().await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductDto),
        (status = 404, description = "No such product", body = ErrorBody)
    )
)]
pub async fn read(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<ProductDto>, AppError> {
    let product = find(&state, id).await?;
    Ok(Json(ProductDto::from(&product)))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<ProductDto>, AppError> {
    let dto: ProductDto = RequestValidator::decode(body)?;
    let mut product = Product::from(dto);
    state.products.add(&mut product).await?;
    tracing::info!(id = product.id, "product created");
    Ok(Json(ProductDto::from(&product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<ProductDto>, AppError> {
    let mut existing = find(&state, id).await?;
    let dto: ProductDto = RequestValidator::decode(body)?;
    let incoming = Product::from(dto);
    existing.name = incoming.name;
    existing.price = incoming.price;
    state.products.update(&existing).await?;
    Ok(Json(ProductDto::from(&existing)))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "No such product", body = ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, AppError> {
    let existing = find(&state, id).await?;
    state.products.delete(&existing).await?;
    tracing::info!(id, "product deleted");
    Ok(StatusCode::OK)
}
