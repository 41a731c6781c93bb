mod api;
mod common;
mod openapi;

pub use api::api_routes;
pub use common::common_routes;
pub use openapi::{openapi_routes, ApiDoc};

use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Full application router: common probes, resources and the OpenAPI document.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(api_routes(state))
        .merge(openapi_routes())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}
