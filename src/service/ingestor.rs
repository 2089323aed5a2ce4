//! Idempotent, fire-and-forget persistence of authenticated events.
//!
//! [`Ingestor::ingest`] performs one atomic upsert keyed by event id.
//! [`Ingestor::dispatch`] runs that upsert on a detached task so the
//! request handler can answer the caller without waiting; the outcome is
//! only ever visible in the logs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::domain::{Clock, WebhookEvent};
use crate::persistence::{PersistenceError, SqliteStore, UpsertOutcome};

/// Writes authenticated events to the store exactly once per id.
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: SqliteStore,
    clock: Arc<dyn Clock>,
}

impl Ingestor {
    /// Creates an ingestor over `store`, stamping rows with `clock`.
    #[must_use]
    pub fn new(store: SqliteStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Upserts `event`, stamping the write with `now`.
    ///
    /// No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Unavailable`] when the store cannot be
    /// opened and [`PersistenceError::WriteFailed`] when the write is
    /// rejected.
    pub async fn ingest(
        &self,
        event: &WebhookEvent,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, PersistenceError> {
        self.store.upsert(event, now).await
    }

    /// Spawns a detached task that ingests `event` at the clock's current
    /// time and logs the result.
    ///
    /// The task is independent of the caller: dropping the returned handle
    /// does not cancel it, and it has no deadline.
    pub fn dispatch(&self, event: WebhookEvent) -> JoinHandle<()> {
        let ingestor = self.clone();
        tokio::spawn(async move {
            let now = ingestor.clock.now();
            match ingestor.ingest(&event, now).await {
                Ok(outcome) => {
                    tracing::info!(
                        webhook_id = %event.id,
                        outcome = outcome.as_str(),
                        "webhook saved to database"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        webhook_id = %event.id,
                        error = %e,
                        "failed to save webhook to database"
                    );
                }
            }
        })
    }
}
