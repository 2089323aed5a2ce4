//! Database models for stored webhook events.

use chrono::{DateTime, Utc};

use crate::domain::{Currency, WebhookEvent};

use super::PersistenceError;

/// A row of the `webhooks` table: the event plus system timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    /// The most recently delivered payload for this id.
    pub event: WebhookEvent,
    /// When the id was first written. Never changes afterwards.
    pub first_seen_at: DateTime<Utc>,
    /// When the row was last written, including re-deliveries.
    pub last_updated_at: DateTime<Utc>,
    /// Number of successful writes for this id.
    pub deliveries: i64,
}

/// Raw column tuple as selected from SQLite.
pub(crate) type EventRow = (
    String,
    String,
    String,
    i64,
    i64,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    i64,
);

impl TryFrom<EventRow> for StoredEvent {
    type Error = PersistenceError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let (
            id,
            amount,
            currency,
            created_at_time,
            timestamp,
            cause,
            full_name,
            account_name,
            invoice_url,
            first_seen_at,
            last_updated_at,
            deliveries,
        ) = row;

        let corrupt = |reason: String| PersistenceError::CorruptRow {
            id: id.clone(),
            reason,
        };
        let amount = amount.parse().map_err(|e| corrupt(format!("{e}")))?;
        let currency: Currency = currency.parse().map_err(|e| corrupt(format!("{e}")))?;

        Ok(Self {
            event: WebhookEvent {
                id,
                amount,
                currency,
                created_at_time,
                timestamp,
                cause,
                full_name,
                account_name,
                invoice_url,
            },
            first_seen_at,
            last_updated_at,
            deliveries,
        })
    }
}
