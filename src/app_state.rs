//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{GatewayConfig, RejectionMessages};
use crate::domain::Clock;
use crate::persistence::SqliteStore;
use crate::service::{Authenticator, Ingestor};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Signature and freshness checks.
    pub authenticator: Arc<Authenticator>,
    /// Detached, idempotent persistence of accepted events.
    pub ingestor: Ingestor,
    /// Read access for the lookup endpoints.
    pub store: SqliteStore,
    /// Time source for freshness checks.
    pub clock: Arc<dyn Clock>,
    /// Wording of authentication rejections.
    pub rejection_messages: RejectionMessages,
}

impl AppState {
    /// Wires the components described by `config` around `clock`.
    #[must_use]
    pub fn from_config(config: &GatewayConfig, clock: Arc<dyn Clock>) -> Self {
        let store = SqliteStore::new(&config.database_file);
        let authenticator = Authenticator::new(
            config.secret_key.clone(),
            config.freshness_window_secs,
        );
        Self {
            authenticator: Arc::new(authenticator),
            ingestor: Ingestor::new(store.clone(), Arc::clone(&clock)),
            store,
            clock,
            rejection_messages: config.rejection_messages,
        }
    }
}
