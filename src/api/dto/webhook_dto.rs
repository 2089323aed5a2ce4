//! Read-side DTOs for stored webhooks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::persistence::StoredEvent;

/// A stored webhook as returned by the lookup endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookRecord {
    /// Provider-assigned identifier.
    pub id: String,
    /// Amount in canonical decimal text.
    pub amount: String,
    /// Currency code.
    pub currency: String,
    /// Provider record-creation time, seconds since epoch.
    pub created_at_time: i64,
    /// Provider send time, seconds since epoch.
    pub timestamp: i64,
    /// Payment reason.
    pub cause: String,
    /// Counterparty full name.
    pub full_name: String,
    /// Counterparty account name.
    pub account_name: String,
    /// Invoice reference URL.
    pub invoice_url: String,
    /// First successful write.
    pub first_seen_at: DateTime<Utc>,
    /// Latest successful write.
    pub last_updated_at: DateTime<Utc>,
    /// Number of successful writes.
    pub deliveries: i64,
}

impl From<StoredEvent> for WebhookRecord {
    fn from(stored: StoredEvent) -> Self {
        let StoredEvent {
            event,
            first_seen_at,
            last_updated_at,
            deliveries,
        } = stored;
        Self {
            id: event.id,
            amount: event.amount.to_string(),
            currency: event.currency.code().to_string(),
            created_at_time: event.created_at_time,
            timestamp: event.timestamp,
            cause: event.cause,
            full_name: event.full_name,
            account_name: event.account_name,
            invoice_url: event.invoice_url,
            first_seen_at,
            last_updated_at,
            deliveries,
        }
    }
}

/// Response body for `GET /debug/webhooks`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookListResponse {
    /// Number of stored webhooks.
    pub count: usize,
    /// Stored webhooks, most recently first seen first.
    pub webhooks: Vec<WebhookRecord>,
}
