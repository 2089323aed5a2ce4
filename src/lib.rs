//! # yaya-gateway
//!
//! Receives payment webhooks from the YaYa Wallet provider, authenticates
//! them, and records each accepted event exactly once per event id.
//!
//! Every notification carries an HMAC-SHA256 signature over its fields in
//! a fixed order plus a send timestamp. Signatures are compared in constant
//! time and events older than the freshness window (or from the future) are
//! turned away. Accepted events are acknowledged immediately and written to
//! SQLite by a detached task using an upsert keyed by event id.
//!
//! ## Architecture
//!
//! ```text
//! Wallet provider (HTTP POST /webhook)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── Authenticator (service/)   ── inline, pure
//!     ├── Ingestor (service/)        ── detached task
//!     │
//!     └── SQLite Persistence (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
