//! Inbound webhook endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::ApiResponse;
use crate::app_state::AppState;
use crate::domain::WebhookEvent;
use crate::error::GatewayError;
use crate::service::authenticator::SIGNATURE_HEADER;

/// `POST /webhook` — Receive a signed payment notification.
///
/// Authentication runs inline; persistence is handed to a detached task
/// and its outcome never affects this response.
///
/// # Errors
///
/// Returns [`GatewayError`] when the signature header is missing, the body
/// is malformed, the timestamp is stale, or the signature does not match.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "Webhooks",
    summary = "Receive a payment webhook",
    description = "Verifies the `YAYA-SIGNATURE` HMAC and the event freshness, acknowledges the caller, then stores the event asynchronously.",
    request_body = WebhookEvent,
    params(
        ("YAYA-SIGNATURE" = String, Header, description = "Lowercase hex HMAC-SHA256 of the concatenated event fields"),
    ),
    responses(
        (status = 200, description = "Webhook accepted", body = ApiResponse),
        (status = 400, description = "Missing signature, invalid data, invalid timestamp or invalid signature", body = ApiResponse),
    )
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    // Non-visible-ASCII header values count as missing.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let now = state.clock.now().timestamp();

    let event = state
        .authenticator
        .authenticate(signature, &body, now)
        .map_err(|rejection| {
            tracing::warn!(reason = %rejection, "webhook rejected");
            GatewayError::from_rejection(rejection, state.rejection_messages)
        })?;

    tracing::info!(webhook_id = %event.id, "webhook accepted");
    drop(state.ingestor.dispatch(event));

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            StatusCode::OK,
            "Webhook received successfully",
        )),
    ))
}

/// Webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_webhook))
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::api::test_support::{NOW, TestApp, read_json, sign, signed_body};
    use crate::config::RejectionMessages;

    fn post(body: &str, signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/webhook").header("content-type", "application/json");
        if let Some(sig) = signature {
            builder = builder.header("YAYA-SIGNATURE", sig);
        }
        let Ok(request) = builder.body(Body::from(body.to_string())) else {
            panic!("request");
        };
        request
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (u16, serde_json::Value) {
        let Ok(response) = app.router().oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status().as_u16();
        (status, read_json(response).await)
    }

    #[tokio::test]
    async fn accepts_signed_fresh_event_and_stores_it() {
        let app = TestApp::new();
        let (body, signature) = signed_body("abc123", NOW);

        let (status, json) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(status, 200);
        assert_eq!(json["status_code"], 200);
        assert_eq!(json["message"], "Webhook received successfully");
        assert!(json.get("error").is_none());

        let Some(stored) = app.wait_for("abc123").await else {
            panic!("event was never stored");
        };
        assert_eq!(stored.event.amount.as_str(), "100");
        assert_eq!(stored.event.cause, "Testing");
    }

    #[tokio::test]
    async fn reference_signature_is_accepted() {
        let app = TestApp::new();
        let signature = sign(
            "abc123100ETB17000000001700000000TestingAbebe Kebedeabebekebede1https://yayawallet.com/en/invoice/xxxx",
        );
        let (body, _) = signed_body("abc123", NOW);
        let (status, _) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn bare_number_amount_is_signed_over_canonical_text() {
        let app = TestApp::new();
        let body = format!(
            r#"{{"id":"num1","amount":100.50,"currency":"ETB","created_at_time":{NOW},"timestamp":{NOW},"cause":"Testing","full_name":"Abebe Kebede","account_name":"abebekebede1","invoice_url":"https://yayawallet.com/en/invoice/xxxx"}}"#
        );
        let signature = sign(&format!(
            "num1100.5ETB{NOW}{NOW}TestingAbebe Kebedeabebekebede1https://yayawallet.com/en/invoice/xxxx"
        ));

        let (status, json) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(status, 200, "{json}");

        let Some(stored) = app.wait_for("num1").await else {
            panic!("event was never stored");
        };
        assert_eq!(stored.event.amount.as_str(), "100.5");

        let literal = sign(&format!(
            "num2100.50ETB{NOW}{NOW}TestingAbebe Kebedeabebekebede1https://yayawallet.com/en/invoice/xxxx"
        ));
        let body = body.replace("\"num1\"", "\"num2\"");
        let (status, json) = send(&app, post(&body, Some(&literal))).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "invalid signature");
    }

    #[tokio::test]
    async fn missing_signature_is_checked_before_body() {
        let app = TestApp::new();
        let (status, json) = send(&app, post("not json", None)).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "signature is missing");
        assert!(json.get("message").is_none());

        let (status, json) = send(&app, post("not json", Some(""))).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "signature is missing");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_data() {
        let app = TestApp::new();
        let (status, json) = send(&app, post(r#"{"id": 5}"#, Some("abc"))).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "invalid data");
    }

    #[tokio::test]
    async fn stale_event_with_valid_signature_is_invalid_timestamp() {
        let app = TestApp::new();
        let (body, signature) = signed_body("old", NOW - 301);
        let (status, json) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "invalid timestamp");
    }

    #[tokio::test]
    async fn future_event_is_invalid_timestamp() {
        let app = TestApp::new();
        let (body, signature) = signed_body("early", NOW + 1);
        let (_, json) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(json["error"], "invalid timestamp");
    }

    #[tokio::test]
    async fn tampered_event_is_invalid_signature() {
        let app = TestApp::new();
        let (body, signature) = signed_body("abc123", NOW);
        let tampered = body.replace("\"100\"", "\"1000\"");
        let (status, json) = send(&app, post(&tampered, Some(&signature))).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "invalid signature");

        let store = app.state.store.clone();
        assert!(matches!(store.count().await, Ok(0)));
    }

    #[tokio::test]
    async fn uniform_mode_hides_the_failed_check() {
        let app = TestApp::with_messages(RejectionMessages::Uniform);
        let (body, signature) = signed_body("abc123", NOW);

        let (_, json) = send(&app, post(&body, None)).await;
        assert_eq!(json["error"], "authentication failed");
        let (stale, stale_sig) = signed_body("abc123", NOW - 1000);
        let (_, json) = send(&app, post(&stale, Some(&stale_sig))).await;
        assert_eq!(json["error"], "authentication failed");
        let (_, json) = send(&app, post(&body, Some("00"))).await;
        assert_eq!(json["error"], "authentication failed");
        let (_, json) = send(&app, post("[]", Some(&signature))).await;
        assert_eq!(json["error"], "invalid data");
    }

    #[tokio::test]
    async fn redelivery_updates_the_single_row() {
        let app = TestApp::new();
        let (body, signature) = signed_body("again", NOW);
        let (status, _) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(status, 200);
        let Some(first) = app.wait_for("again").await else {
            panic!("first delivery never stored");
        };

        app.clock.advance(chrono::Duration::seconds(10));
        let (status, _) = send(&app, post(&body, Some(&signature))).await;
        assert_eq!(status, 200);
        let Some(second) = app.wait_for_deliveries("again", 2).await else {
            panic!("second delivery never stored");
        };

        assert_eq!(second.first_seen_at, first.first_seen_at);
        assert!(second.last_updated_at > first.last_updated_at);
        assert!(matches!(app.state.store.count().await, Ok(1)));
    }
}
