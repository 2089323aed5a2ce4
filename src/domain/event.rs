//! Inbound payment notification from the wallet provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Amount;

/// Currency code of a payment notification.
///
/// The provider currently only settles in Ethiopian birr; any other code
/// fails to decode and the request is rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Ethiopian birr.
    #[serde(rename = "ETB")]
    Etb,
}

impl Currency {
    /// Returns the ISO-4217 code used on the wire and in signatures.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Etb => "ETB",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ETB" => Ok(Self::Etb),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

/// A single webhook payload describing a payment.
///
/// Built only by decoding a request body and never mutated afterwards.
/// `id` is the natural key used for idempotent storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookEvent {
    /// Provider-assigned unique identifier.
    pub id: String,
    /// Payment amount, as a decimal string or a bare JSON number.
    #[schema(value_type = String, example = "100")]
    pub amount: Amount,
    /// Settlement currency.
    #[schema(value_type = String, example = "ETB")]
    pub currency: Currency,
    /// Provider record-creation time, seconds since epoch.
    pub created_at_time: i64,
    /// Provider send time, seconds since epoch. Drives the freshness check.
    pub timestamp: i64,
    /// Free-text payment reason.
    pub cause: String,
    /// Counterparty full name.
    pub full_name: String,
    /// Counterparty account name.
    pub account_name: String,
    /// Invoice reference URL.
    pub invoice_url: String,
}

impl WebhookEvent {
    /// Returns the string the provider signs.
    ///
    /// Fields are concatenated without separators in this exact order: id,
    /// amount, currency, created_at_time, timestamp, cause, full_name,
    /// account_name, invoice_url. Changing the order breaks every
    /// previously issued signature.
    #[must_use]
    pub fn signing_payload(&self) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}",
            self.id,
            self.amount,
            self.currency,
            self.created_at_time,
            self.timestamp,
            self.cause,
            self.full_name,
            self.account_name,
            self.invoice_url,
        )
    }
}
