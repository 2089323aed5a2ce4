//! Service layer: webhook authentication and ingestion.
//!
//! [`Authenticator`] decides whether a notification is authentic and
//! fresh. [`Ingestor`] records accepted notifications idempotently, off
//! the request path.

pub mod authenticator;
pub mod ingestor;

pub use authenticator::{Authenticator, Rejection, SigningSecret};
pub use ingestor::Ingestor;
