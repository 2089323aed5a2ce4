//! Read-side endpoints over the stored webhooks.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ApiResponse, WebhookListResponse, WebhookRecord};
use crate::app_state::AppState;
use crate::error::GatewayError;

/// `GET /webhook/{id}` — Fetch one stored webhook.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] for an unknown id and
/// [`GatewayError::Persistence`] when the store cannot be read.
#[utoipa::path(
    get,
    path = "/webhook/{id}",
    tag = "Webhooks",
    summary = "Get a stored webhook",
    description = "Returns the most recent payload stored for the given event id.",
    params(
        ("id" = String, Path, description = "Provider event id"),
    ),
    responses(
        (status = 200, description = "Stored webhook", body = WebhookRecord),
        (status = 404, description = "Webhook not found", body = ApiResponse),
        (status = 500, description = "Database error", body = ApiResponse),
    )
)]
pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let stored = state
        .store
        .find(&id)
        .await?
        .ok_or(GatewayError::NotFound(id))?;
    Ok(Json(WebhookRecord::from(stored)))
}

/// `GET /webhook/` — Lookup without an id.
///
/// # Errors
///
/// Always returns [`GatewayError::MissingWebhookId`].
pub async fn missing_webhook_id() -> Result<Json<WebhookRecord>, GatewayError> {
    Err(GatewayError::MissingWebhookId)
}

/// `GET /debug/webhooks` — List every stored webhook.
///
/// # Errors
///
/// Returns [`GatewayError::Persistence`] when the store cannot be read.
#[utoipa::path(
    get,
    path = "/debug/webhooks",
    tag = "Webhooks",
    summary = "List stored webhooks",
    description = "Debug listing of all stored webhooks, most recently first seen first.",
    responses(
        (status = 200, description = "All stored webhooks", body = WebhookListResponse),
        (status = 500, description = "Database error", body = ApiResponse),
    )
)]
pub async fn list_webhooks(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let webhooks: Vec<WebhookRecord> = state
        .store
        .list()
        .await?
        .into_iter()
        .map(WebhookRecord::from)
        .collect();
    Ok(Json(WebhookListResponse {
        count: webhooks.len(),
        webhooks,
    }))
}

/// Lookup routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/webhook/", get(missing_webhook_id))
        .route("/webhook/{id}", get(get_webhook))
        .route("/debug/webhooks", get(list_webhooks))
}
