//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Routes are mounted at the root to match the provider's configured
//! callback URL (`POST /webhook`).

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "yaya-gateway",
        description = "Authenticated, idempotent ingestion of YaYa Wallet payment webhooks."
    ),
    paths(
        handlers::webhook::receive_webhook,
        handlers::events::get_webhook,
        handlers::events::list_webhooks,
        handlers::system::health_handler,
    ),
    components(schemas(
        crate::domain::WebhookEvent,
        dto::ApiResponse,
        dto::WebhookRecord,
        dto::WebhookListResponse,
    )),
    tags(
        (name = "Webhooks", description = "Webhook intake and lookup"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
