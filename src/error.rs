//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the HTTP surface. Each
//! variant maps to a status code and a public message rendered in the
//! [`ApiResponse`] envelope. Internal detail (decode errors, SQL errors)
//! stays in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::dto::ApiResponse;
use crate::config::RejectionMessages;
use crate::persistence::PersistenceError;
use crate::service::Rejection;

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant                 | HTTP Status               | Public message          |
/// |-------------------------|---------------------------|-------------------------|
/// | `MissingSignature`      | 400 Bad Request           | `signature is missing`  |
/// | `InvalidData`           | 400 Bad Request           | `invalid data`          |
/// | `InvalidTimestamp`      | 400 Bad Request           | `invalid timestamp`     |
/// | `InvalidSignature`      | 400 Bad Request           | `invalid signature`     |
/// | `AuthenticationFailed`  | 400 Bad Request           | `authentication failed` |
/// | `MissingWebhookId`      | 400 Bad Request           | `webhook ID is required`|
/// | `NotFound`              | 404 Not Found             | `webhook not found`     |
/// | `Persistence`           | 500 Internal Server Error | `database error`        |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The signature header is absent or empty.
    #[error("signature is missing")]
    MissingSignature,

    /// The body is not a valid webhook event.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The event timestamp is outside the freshness window.
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// The signature does not match the event.
    #[error("invalid signature")]
    InvalidSignature,

    /// Any authentication failure, when rejections are not distinguished.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// A lookup was made without an event id.
    #[error("webhook ID is required")]
    MissingWebhookId,

    /// No stored webhook has the requested id.
    #[error("webhook not found: {0}")]
    NotFound(String),

    /// Persistence layer failure on a read endpoint.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl GatewayError {
    /// Maps an authentication [`Rejection`] to its HTTP error, honouring
    /// the configured wording.
    #[must_use]
    pub fn from_rejection(rejection: Rejection, messages: RejectionMessages) -> Self {
        match (rejection, messages) {
            (Rejection::InvalidData(detail), _) => Self::InvalidData(detail),
            (_, RejectionMessages::Uniform) => Self::AuthenticationFailed,
            (Rejection::MissingSignature, RejectionMessages::Distinct) => Self::MissingSignature,
            (Rejection::InvalidTimestamp { .. }, RejectionMessages::Distinct) => {
                Self::InvalidTimestamp
            }
            (Rejection::InvalidSignature, RejectionMessages::Distinct) => Self::InvalidSignature,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature
            | Self::InvalidData(_)
            | Self::InvalidTimestamp
            | Self::InvalidSignature
            | Self::AuthenticationFailed
            | Self::MissingWebhookId => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message shown to the caller.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingSignature => "signature is missing",
            Self::InvalidData(_) => "invalid data",
            Self::InvalidTimestamp => "invalid timestamp",
            Self::InvalidSignature => "invalid signature",
            Self::AuthenticationFailed => "authentication failed",
            Self::MissingWebhookId => "webhook ID is required",
            Self::NotFound(_) => "webhook not found",
            Self::Persistence(_) => "database error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, axum::Json(ApiResponse::error(status, self.public_message()))).into_response()
    }
}
