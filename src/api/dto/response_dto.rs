//! Response envelope shared by the webhook and system endpoints.

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// Status code plus either a success message or an error string.
///
/// Exactly one of `message` and `error` is present:
/// ```json
/// { "status_code": 400, "error": "invalid signature" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApiResponse {
    /// HTTP status code, repeated in the body.
    pub status_code: u16,
    /// Human-readable success message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Builds a success envelope.
    #[must_use]
    pub fn success(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: Some(message.into()),
            error: None,
        }
    }

    /// Builds an error envelope.
    #[must_use]
    pub fn error(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: None,
            error: Some(error.into()),
        }
    }
}
