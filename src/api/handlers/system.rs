//! System endpoints: health check.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ApiResponse;
use crate::app_state::AppState;

/// `GET /healthcheck` — Service health status.
#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "System",
    summary = "Health check",
    description = "Returns a fixed success envelope while the server is accepting requests.",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(StatusCode::OK, "Server is up and running")),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/healthcheck", get(health_handler))
}
