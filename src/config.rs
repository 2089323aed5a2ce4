//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Only the shared secret is mandatory.
//! Settings that affect authentication are rejected when present but
//! malformed; the rest fall back to their defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::service::SigningSecret;
use crate::service::authenticator::DEFAULT_FRESHNESS_WINDOW_SECS;

/// How authentication rejections are worded in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectionMessages {
    /// One message per failed check (`signature is missing`,
    /// `invalid timestamp`, `invalid signature`). Wire compatible with
    /// existing provider integrations.
    #[default]
    Distinct,
    /// A single `authentication failed` message for every failed check,
    /// so callers cannot tell which check tripped.
    Uniform,
}

impl std::str::FromStr for RejectionMessages {
    type Err = ConfigError;

    /// Case-insensitive; surrounding whitespace is not trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("distinct") {
            Ok(Self::Distinct)
        } else if s.eq_ignore_ascii_case("uniform") {
            Ok(Self::Uniform)
        } else {
            Err(ConfigError::InvalidRejectionMessages(s.to_string()))
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Fatal configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `YAYA_SECRET_KEY` is unset or empty.
    #[error("YAYA_SECRET_KEY must be set to a non-empty value")]
    MissingSecret,

    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR {value:?}: {source}")]
    InvalidListenAddr {
        /// The rejected value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// `FRESHNESS_WINDOW_SECS` is set but is not a whole number of seconds.
    #[error("invalid FRESHNESS_WINDOW_SECS {value:?}: {source}")]
    InvalidFreshnessWindow {
        /// The rejected value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::num::ParseIntError,
    },

    /// `REJECTION_MESSAGES` is set but is neither `distinct` nor `uniform`.
    #[error("invalid REJECTION_MESSAGES {0:?}: expected \"distinct\" or \"uniform\"")]
    InvalidRejectionMessages(String),
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Secret shared with the wallet provider for HMAC signatures.
    pub secret_key: SigningSecret,

    /// Path of the SQLite database file.
    pub database_file: PathBuf,

    /// Maximum accepted age of an event, in seconds.
    pub freshness_window_secs: u64,

    /// Wording of authentication rejections.
    pub rejection_messages: RejectionMessages,

    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the secret is missing, or if
    /// `LISTEN_ADDR`, `FRESHNESS_WINDOW_SECS` or `REJECTION_MESSAGES` is
    /// present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Absent settings take their defaults. `SHUTDOWN_TIMEOUT_SECS` and
    /// `LOG_FORMAT` also fall back when unparsable.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the secret is missing, or if
    /// `LISTEN_ADDR`, `FRESHNESS_WINDOW_SECS` or `REJECTION_MESSAGES` is
    /// present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let listen_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let secret_key = lookup("YAYA_SECRET_KEY")
            .map(SigningSecret::new)
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let database_file = lookup("DATABASE_FILE")
            .filter(|s| !s.is_empty())
            .map_or_else(|| PathBuf::from("./yaya_webhooks.db"), PathBuf::from);

        let freshness_window_secs = match lookup("FRESHNESS_WINDOW_SECS") {
            None => DEFAULT_FRESHNESS_WINDOW_SECS,
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidFreshnessWindow { value, source })?,
        };
        let shutdown_timeout_secs = parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 10);

        let rejection_messages = match lookup("REJECTION_MESSAGES") {
            None => RejectionMessages::default(),
            Some(value) => value.parse()?,
        };
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            secret_key,
            database_file,
            freshness_window_secs,
            rejection_messages,
            shutdown_timeout_secs,
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_only_secret() {
        let Ok(config) = load(&[("YAYA_SECRET_KEY", "s3cret")]) else {
            panic!("config should load");
        };
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.database_file, PathBuf::from("./yaya_webhooks.db"));
        assert_eq!(config.freshness_window_secs, 300);
        assert_eq!(config.shutdown_timeout_secs, 10);
        assert_eq!(config.rejection_messages, RejectionMessages::Distinct);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn missing_or_empty_secret_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingSecret)));
        assert!(matches!(
            load(&[("YAYA_SECRET_KEY", "")]),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn bad_listen_addr_is_fatal() {
        let result = load(&[("YAYA_SECRET_KEY", "k"), ("LISTEN_ADDR", "nowhere")]);
        assert!(matches!(result, Err(ConfigError::InvalidListenAddr { .. })));
    }

    #[test]
    fn overrides_are_read() {
        let Ok(config) = load(&[
            ("YAYA_SECRET_KEY", "k"),
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("DATABASE_FILE", "/tmp/w.db"),
            ("FRESHNESS_WINDOW_SECS", "60"),
            ("REJECTION_MESSAGES", "uniform"),
            ("SHUTDOWN_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "json"),
        ]) else {
            panic!("config should load");
        };
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.database_file, PathBuf::from("/tmp/w.db"));
        assert_eq!(config.freshness_window_secs, 60);
        assert_eq!(config.rejection_messages, RejectionMessages::Uniform);
        assert_eq!(config.shutdown_timeout_secs, 3);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn malformed_window_is_fatal() {
        for bad in ["30s", "-1", "soon", "", " 300"] {
            let result = load(&[("YAYA_SECRET_KEY", "k"), ("FRESHNESS_WINDOW_SECS", bad)]);
            let Err(ConfigError::InvalidFreshnessWindow { value, .. }) = &result else {
                panic!("{bad:?} should be rejected, got {result:?}");
            };
            assert_eq!(value, bad);
        }
    }

    #[test]
    fn malformed_rejection_messages_is_fatal() {
        for bad in ["uniform ", "unifrom", "", "both"] {
            let result = load(&[("YAYA_SECRET_KEY", "k"), ("REJECTION_MESSAGES", bad)]);
            let Err(ConfigError::InvalidRejectionMessages(value)) = &result else {
                panic!("{bad:?} should be rejected, got {result:?}");
            };
            assert_eq!(value, bad);
        }
    }

    #[test]
    fn rejection_messages_ignore_case() {
        for (raw, expected) in [
            ("Uniform", RejectionMessages::Uniform),
            ("UNIFORM", RejectionMessages::Uniform),
            ("Distinct", RejectionMessages::Distinct),
        ] {
            let Ok(config) = load(&[("YAYA_SECRET_KEY", "k"), ("REJECTION_MESSAGES", raw)]) else {
                panic!("{raw:?} should load");
            };
            assert_eq!(config.rejection_messages, expected);
        }
    }

    #[test]
    fn unparsable_shutdown_timeout_falls_back_to_default() {
        let Ok(config) = load(&[("YAYA_SECRET_KEY", "k"), ("SHUTDOWN_TIMEOUT_SECS", "soon")])
        else {
            panic!("config should load");
        };
        assert_eq!(config.shutdown_timeout_secs, 10);
    }
}
