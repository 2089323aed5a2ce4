//! Persistence layer: SQLite storage of webhook events.
//!
//! One logical table, `webhooks`, keyed by event id. Amounts are stored as
//! their canonical decimal text. See [`sqlite::SqliteStore`].

pub mod models;
pub mod sqlite;

pub use models::StoredEvent;
pub use sqlite::{SqliteStore, UpsertOutcome};

/// Failure talking to the event store.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The database could not be opened or its schema created.
    #[error("persistence unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The database was reachable but rejected the write.
    #[error("write failed: {0}")]
    WriteFailed(#[source] sqlx::Error),

    /// The database was reachable but a read query failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] sqlx::Error),

    /// A stored row holds values the domain model cannot represent.
    #[error("corrupt row {id}: {reason}")]
    CorruptRow {
        /// Event id of the offending row.
        id: String,
        /// What failed to decode.
        reason: String,
    },
}
