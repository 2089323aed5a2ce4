//! REST endpoint handlers organized by resource.

pub mod events;
pub mod system;
pub mod webhook;

use axum::Router;

use crate::app_state::AppState;

/// Composes the webhook intake and lookup routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(webhook::routes()).merge(events::routes())
}
