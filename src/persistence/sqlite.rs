//! SQLite implementation of the persistence layer.
//!
//! Every operation opens its own connection, ensures the schema, does its
//! work, and closes the connection again. No handle is shared between
//! calls; SQLite's file lock serialises concurrent writers.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

use super::PersistenceError;
use super::models::{EventRow, StoredEvent};
use crate::domain::WebhookEvent;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS webhooks (
    id TEXT PRIMARY KEY NOT NULL,
    amount TEXT NOT NULL,
    currency TEXT NOT NULL,
    created_at_time INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    cause TEXT NOT NULL,
    full_name TEXT NOT NULL,
    account_name TEXT NOT NULL,
    invoice_url TEXT NOT NULL,
    first_seen_at TEXT NOT NULL,
    last_updated_at TEXT NOT NULL,
    deliveries INTEGER NOT NULL DEFAULT 1
)";

// `first_seen_at` is only ever written by the insert branch.
const UPSERT: &str = "INSERT INTO webhooks (
    id, amount, currency, created_at_time, timestamp, cause,
    full_name, account_name, invoice_url, first_seen_at, last_updated_at, deliveries
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
ON CONFLICT(id) DO UPDATE SET
    amount = excluded.amount,
    currency = excluded.currency,
    created_at_time = excluded.created_at_time,
    timestamp = excluded.timestamp,
    cause = excluded.cause,
    full_name = excluded.full_name,
    account_name = excluded.account_name,
    invoice_url = excluded.invoice_url,
    last_updated_at = excluded.last_updated_at,
    deliveries = webhooks.deliveries + 1
RETURNING deliveries";

const SELECT_ONE: &str = "SELECT id, amount, currency, created_at_time, timestamp, cause, \
     full_name, account_name, invoice_url, first_seen_at, last_updated_at, deliveries \
     FROM webhooks WHERE id = ?";

const SELECT_ALL: &str = "SELECT id, amount, currency, created_at_time, timestamp, cause, \
     full_name, account_name, invoice_url, first_seen_at, last_updated_at, deliveries \
     FROM webhooks ORDER BY first_seen_at DESC, id ASC";

/// Result of a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for the id; one was created.
    Inserted,
    /// A row existed; its non-key fields were overwritten. Carries the
    /// number of successful writes for the id, this one included.
    Updated {
        /// Successful writes so far, always at least 2.
        deliveries: i64,
    },
}

impl UpsertOutcome {
    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Updated { .. } => "updated",
        }
    }
}

/// File-backed SQLite store for webhook events.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Creates a store for the database file at `path`. The file is
    /// created on first use if missing; nothing is opened here.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self { options }
    }

    /// Inserts `event` or overwrites the existing row with the same id.
    ///
    /// `first_seen_at` is set to `now` only on insert; `last_updated_at`
    /// is set to `now` on every write.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Unavailable`] if the database cannot be
    /// opened or its schema created, and [`PersistenceError::WriteFailed`]
    /// if the statement itself is rejected.
    pub async fn upsert(
        &self,
        event: &WebhookEvent,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, PersistenceError> {
        let mut conn = self.connect().await?;

        let deliveries = sqlx::query_scalar::<_, i64>(UPSERT)
            .bind(&event.id)
            .bind(event.amount.as_str())
            .bind(event.currency.code())
            .bind(event.created_at_time)
            .bind(event.timestamp)
            .bind(&event.cause)
            .bind(&event.full_name)
            .bind(&event.account_name)
            .bind(&event.invoice_url)
            .bind(now)
            .bind(now)
            .fetch_one(&mut conn)
            .await
            .map_err(PersistenceError::WriteFailed);

        close(conn).await;
        let outcome = match deliveries? {
            1 => UpsertOutcome::Inserted,
            deliveries => UpsertOutcome::Updated { deliveries },
        };
        Ok(outcome)
    }

    /// Loads the stored row for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the database is unavailable, the
    /// query fails, or the row cannot be decoded.
    pub async fn find(&self, id: &str) -> Result<Option<StoredEvent>, PersistenceError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, EventRow>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&mut conn)
            .await
            .map_err(PersistenceError::ReadFailed);
        close(conn).await;

        row?.map(StoredEvent::try_from).transpose()
    }

    /// Loads every stored row, most recently first seen first.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the database is unavailable, the
    /// query fails, or a row cannot be decoded.
    pub async fn list(&self) -> Result<Vec<StoredEvent>, PersistenceError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, EventRow>(SELECT_ALL)
            .fetch_all(&mut conn)
            .await
            .map_err(PersistenceError::ReadFailed);
        close(conn).await;

        rows?.into_iter().map(StoredEvent::try_from).collect()
    }

    /// Returns the number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the database is unavailable or the
    /// query fails.
    pub async fn count(&self) -> Result<i64, PersistenceError> {
        let mut conn = self.connect().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM webhooks")
            .fetch_one(&mut conn)
            .await
            .map_err(PersistenceError::ReadFailed);
        close(conn).await;
        count
    }

    /// Opens a fresh connection and makes sure the table exists.
    async fn connect(&self) -> Result<SqliteConnection, PersistenceError> {
        let mut conn = self
            .options
            .connect()
            .await
            .map_err(PersistenceError::Unavailable)?;
        if let Err(e) = sqlx::query(CREATE_TABLE).execute(&mut conn).await {
            close(conn).await;
            return Err(PersistenceError::Unavailable(e));
        }
        Ok(conn)
    }
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "failed to close sqlite connection");
    }
}
