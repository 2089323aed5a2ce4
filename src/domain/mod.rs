//! Domain layer: the webhook event model and its supporting types.
//!
//! This module holds the decoded notification ([`WebhookEvent`]), its exact
//! decimal [`Amount`], the settlement [`Currency`], and the injectable
//! [`Clock`] used wherever the service needs the current time.

pub mod amount;
pub mod clock;
pub mod event;

pub use amount::{Amount, AmountError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{Currency, UnknownCurrency, WebhookEvent};
