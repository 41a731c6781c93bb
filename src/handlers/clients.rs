//! /clients handlers. Reads eagerly load each client's sales.

use crate::dto::{ClientDto, SalesDto};
use crate::entity::{Client, ClientRelation};
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

const WITH_SALES: &[ClientRelation] = &[ClientRelation::Sales];

#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    responses((status = 200, description = "All clients with their sales", body = Vec<ClientDto>))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClientDto>>, AppError> {
    let clients = state.clients.get_all_with_eager_loading(WITH_SALES).await?;
    Ok(Json(clients.iter().map(ClientDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client with its sales", body = ClientDto),
        (status = 404, description = "No such client", body = ErrorBody)
    )
)]
pub async fn read(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<ClientDto>, AppError> {
    let client = state
        .clients
        .get_by_id_with_eager_loading(id, WITH_SALES)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("client {}", id)))?;
    Ok(Json(ClientDto::from(&client)))
}

/// Sales of one client; an unknown client has none.
#[utoipa::path(
    get,
    path = "/clients/{id}/sales",
    tag = "clients",
    params(("id" = i32, Path, description = "Client id")),
    responses((status = 200, description = "Sales owned by the client", body = Vec<SalesDto>))
)]
pub async fn sales(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Vec<SalesDto>>, AppError> {
    let sales = state
        .clients
        .get_by_id_with_eager_loading(id, WITH_SALES)
        .await?
        .and_then(|c| c.sales)
        .unwrap_or_default();
    Ok(Json(sales.iter().map(SalesDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = ClientDto,
    responses(
        (status = 200, description = "Client created", body = ClientDto),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<ClientDto>, AppError> {
    let dto: ClientDto = RequestValidator::decode(body)?;
    let mut client = Client::from(dto);
    state.clients.add(&mut client).await?;
    tracing::info!(id = client.id, "client created");
    Ok(Json(ClientDto::from(&client)))
}

/// Renames a client. Existence is checked before the body.
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i32, Path, description = "Client id")),
    request_body = ClientDto,
    responses(
        (status = 200, description = "Client updated", body = ClientDto),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such client", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<ClientDto>, AppError> {
    let mut existing = state
        .clients
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("client {}", id)))?;
    let dto: ClientDto = RequestValidator::decode(body)?;
    existing.name = dto.name;
    state.clients.update(&existing).await?;
    Ok(Json(ClientDto::from(&existing)))
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client and its sales deleted"),
        (status = 404, description = "No such client", body = ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, AppError> {
    let existing = state
        .clients
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("client {}", id)))?;
    state.clients.delete(&existing).await?;
    tracing::info!(id, "client deleted");
    Ok(StatusCode::OK)
}
