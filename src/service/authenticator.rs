//! Webhook authentication: HMAC-SHA256 signatures and replay protection.
//!
//! [`Authenticator`] decides whether an inbound notification is authentic
//! and fresh. It performs no I/O; the only external input is the `now`
//! value the caller passes in, which keeps boundary tests deterministic.
//!
//! Checks run in a fixed order: missing signature, malformed body,
//! freshness, signature match. A stale notification is always reported as
//! stale, even when its signature is correct.

use std::fmt;

use hmac::digest::Key;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::WebhookEvent;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the provider's signature.
pub const SIGNATURE_HEADER: &str = "YAYA-SIGNATURE";

/// Default freshness window, in seconds.
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 300;

/// Shared HMAC secret. Its contents never appear in `Debug` output.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wraps raw secret bytes.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// Returns `true` when the secret has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Why a notification was turned away.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// No signature header, or an empty one.
    #[error("signature is missing")]
    MissingSignature,

    /// The body did not decode into a [`WebhookEvent`].
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The event timestamp is older than the window or in the future.
    #[error("timestamp outside freshness window ({diff_secs:?}s from now)")]
    InvalidTimestamp {
        /// `now - timestamp`, or `None` when the subtraction overflows.
        diff_secs: Option<i64>,
    },

    /// The reconstructed signature does not match the provided one.
    #[error("signature mismatch")]
    InvalidSignature,
}

/// Verifies webhook signatures and freshness with an injected secret.
#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: SigningSecret,
    freshness_window_secs: u64,
}

impl Authenticator {
    /// Creates an authenticator for `secret` accepting events at most
    /// `freshness_window_secs` old.
    #[must_use]
    pub fn new(secret: SigningSecret, freshness_window_secs: u64) -> Self {
        Self {
            secret,
            freshness_window_secs,
        }
    }

    /// Runs the full inbound pipeline on a raw request.
    ///
    /// `signature` is the header value (if any), `body` the undecoded
    /// request body, and `now` the verifier's clock in epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] hit, in check order.
    pub fn authenticate(
        &self,
        signature: Option<&str>,
        body: &[u8],
        now: i64,
    ) -> Result<WebhookEvent, Rejection> {
        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or(Rejection::MissingSignature)?;

        let event: WebhookEvent =
            serde_json::from_slice(body).map_err(|e| Rejection::InvalidData(e.to_string()))?;

        self.check(&event, signature, now)?;
        Ok(event)
    }

    /// Returns `true` when `event` is fresh at `now` and `provided` is its
    /// signature.
    #[must_use]
    pub fn verify(&self, event: &WebhookEvent, provided: &str, now: i64) -> bool {
        self.check(event, provided, now).is_ok()
    }

    /// Freshness first, then signature.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::InvalidTimestamp`] or
    /// [`Rejection::InvalidSignature`].
    pub fn check(&self, event: &WebhookEvent, provided: &str, now: i64) -> Result<(), Rejection> {
        let diff_secs = now.checked_sub(event.timestamp);
        let window = i64::try_from(self.freshness_window_secs).unwrap_or(i64::MAX);
        let fresh = diff_secs.is_some_and(|diff| (0..=window).contains(&diff));
        tracing::debug!(
            event_id = %event.id,
            timestamp = event.timestamp,
            now,
            ?diff_secs,
            window,
            "validating timestamp"
        );
        if !fresh {
            return Err(Rejection::InvalidTimestamp { diff_secs });
        }

        let expected = self.sign(event);
        if constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
            Ok(())
        } else {
            Err(Rejection::InvalidSignature)
        }
    }

    /// Computes the lowercase hex signature the provider should have sent
    /// for `event`.
    #[must_use]
    pub fn sign(&self, event: &WebhookEvent) -> String {
        compute_signature(self.secret.as_bytes(), &event.signing_payload())
    }
}

/// HMAC-SHA256 of `payload` keyed by `secret`, as lowercase hex.
///
/// Keys of any length are accepted.
#[must_use]
pub fn compute_signature(secret: &[u8], payload: &str) -> String {
    let mut mac = <HmacSha256 as Mac>::new(&block_key(secret));
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Expands `secret` to the block-sized HMAC key: hashed when longer than
/// a block, then zero padded (RFC 2104).
fn block_key(secret: &[u8]) -> Key<HmacSha256> {
    let mut key = Key::<HmacSha256>::default();
    if secret.len() > key.len() {
        let digest = <Sha256 as Digest>::digest(secret);
        key.iter_mut().zip(digest).for_each(|(slot, byte)| *slot = byte);
    } else {
        key.iter_mut().zip(secret).for_each(|(slot, byte)| *slot = *byte);
    }
    key
}

/// Equal-length inputs are compared without early exit. A length mismatch
/// returns at once, which only reveals the length of the expected value:
/// always 64 hex characters.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
