//! Data Transfer Objects for REST request/response serialization.
//!
//! Amounts are serialized as JSON strings holding their canonical decimal
//! text so no client ever sees a rounded float.

pub mod response_dto;
pub mod webhook_dto;

pub use response_dto::*;
pub use webhook_dto::*;
