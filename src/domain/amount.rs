//! Exact decimal amount carried as canonical text.
//!
//! [`Amount`] never goes through a float. The provider may send the value
//! as a JSON string (`"100.50"`) or a bare JSON number (`100.50`); both are
//! read from the raw JSON literal and normalised to one canonical string,
//! which is what the signature is computed over and what the store keeps.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Largest exponent magnitude accepted in scientific notation.
const MAX_EXPONENT: i64 = 1_000;

/// Reasons an amount literal is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The literal is empty.
    #[error("amount is empty")]
    Empty,

    /// The literal is not a decimal number.
    #[error("amount is not a decimal number: {0:?}")]
    NotDecimal(String),

    /// The value is below zero.
    #[error("amount must not be negative: {0}")]
    Negative(String),

    /// The exponent is too large to expand.
    #[error("amount exponent out of range: {0}")]
    ExponentOutOfRange(String),
}

/// Non-negative, arbitrary-precision decimal amount.
///
/// Canonical form: no sign, no leading integer zeros (a lone `0` is kept),
/// no trailing fractional zeros, no dangling `.`, and no exponent. `"0100.50"`,
/// `"100.5"` and `"1.005e2"` all canonicalise to `"100.5"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Returns the canonical decimal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize(s).map(Self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();
        let literal = if text.starts_with('"') {
            serde_json::from_str::<String>(text).map_err(de::Error::custom)?
        } else {
            text.to_string()
        };
        literal.parse().map_err(de::Error::custom)
    }
}

fn canonicalize(input: &str) -> Result<String, AmountError> {
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    let not_decimal = || AmountError::NotDecimal(input.to_string());

    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => {
            let exp: i64 = e.parse().map_err(|_| not_decimal())?;
            if exp.abs() > MAX_EXPONENT {
                return Err(AmountError::ExponentOutOfRange(input.to_string()));
            }
            (m, exp)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.len() + frac_part.len() == 0 || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(not_decimal());
    }

    let digits = format!("{int_part}{frac_part}");
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok("0".to_string());
    }
    if negative {
        return Err(AmountError::Negative(input.to_string()));
    }

    // Position of the decimal point relative to the first significant digit.
    let stripped = i64::try_from(digits.len() - significant.len()).map_err(|_| not_decimal())?;
    let int_len = i64::try_from(int_part.len()).map_err(|_| not_decimal())?;
    let point = int_len + exponent - stripped;
    let sig_len = i64::try_from(significant.len()).map_err(|_| not_decimal())?;

    let (whole, fraction) = if point <= 0 {
        let pad = usize::try_from(-point).map_err(|_| not_decimal())?;
        ("0".to_string(), format!("{}{significant}", "0".repeat(pad)))
    } else if point >= sig_len {
        let pad = usize::try_from(point - sig_len).map_err(|_| not_decimal())?;
        (format!("{significant}{}", "0".repeat(pad)), String::new())
    } else {
        let at = usize::try_from(point).map_err(|_| not_decimal())?;
        let (w, f) = significant.split_at_checked(at).ok_or_else(not_decimal)?;
        (w.to_string(), f.to_string())
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(whole)
    } else {
        Ok(format!("{whole}.{fraction}"))
    }
}
