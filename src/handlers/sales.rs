//! /sales handlers. Mutations answer 201 Created / 204 No Content.

use crate::dto::SalesDto;
use crate::entity::Sales;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

async fn find(state: &AppState, id: i32) -> Result<Sales, AppError> {
    state
        .sales
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sales {}", id)))
}

#[utoipa::path(
    get,
    path = "/sales",
    tag = "sales",
    responses((status = 200, description = "All sales", body = Vec<SalesDto>))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SalesDto>>, AppError> {
    let sales = state.sales.get_all().await?;
    Ok(Json(sales.iter().map(SalesDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/sales/{id}",
    tag = "sales",
    params(("id" = i32, Path, description = "Sales id")),
    responses(
        (status = 200, description = "Sale", body = SalesDto),
        (status = 404, description = "No such sale", body = ErrorBody)
    )
)]
pub async fn read(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<SalesDto>, AppError> {
    let sale = find(&state, id).await?;
    Ok(Json(SalesDto::from(&sale)))
}

#[utoipa::path(
    post,
    path = "/sales",
    tag = "sales",
    request_body = SalesDto,
    responses(
        (status = 201, description = "Sale created", body = SalesDto),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let dto: SalesDto = RequestValidator::decode(body)?;
    let mut sale = Sales::from(dto);
    state.sales.add(&mut sale).await?;
    tracing::info!(id = sale.id, client_id = sale.client_id, product_id = sale.product_id, "sale created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/sales/{}", sale.id))],
        Json(SalesDto::from(&sale)),
    ))
}

/// Re-points a sale to another client and product.
#[utoipa::path(
    put,
    path = "/sales/{id}",
    tag = "sales",
    params(("id" = i32, Path, description = "Sales id")),
    request_body = SalesDto,
    responses(
        (status = 204, description = "Sale updated"),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such sale", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let mut existing = find(&state, id).await?;
    let dto: SalesDto = RequestValidator::decode(body)?;
    existing.client_id = dto.client_id;
    existing.product_id = dto.product_id;
    state.sales.update(&existing).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/sales/{id}",
    tag = "sales",
    params(("id" = i32, Path, description = "Sales id")),
    responses(
        (status = 204, description = "Sale deleted"),
        (status = 404, description = "No such sale", body = ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, AppError> {
    let existing = find(&state, id).await?;
    state.sales.delete(&existing).await?;
    Ok(StatusCode::NO_CONTENT)
}
