//! Fixed-point token amounts.
//!
//! One whole token is 10^18 base units ("attos"). All arithmetic is integer
//! arithmetic on u128; nothing here ever touches floating point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmountError;

pub const DECIMALS: usize = 18;
pub const ATTOS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Maximum fractional digits shown when formatting. Display output is lossy
/// beyond this; round-tripping through `to_string` is NOT an identity for
/// amounts with more than four significant fractional digits.
const DISPLAY_FRACTION_DIGITS: usize = 4;

/// A non-negative token amount in attos.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_tokens(tokens: u128) -> Self {
        Amount(tokens * ATTOS_PER_TOKEN)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whole-token part, fraction discarded.
    pub fn whole_tokens(&self) -> u128 {
        self.0 / ATTOS_PER_TOKEN
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// `floor(self * numer / denom)`. Multiplies before dividing so no
    /// precision is lost; `None` on overflow or a zero denominator.
    pub fn checked_mul_div(self, numer: Amount, denom: Amount) -> Option<Amount> {
        if denom.0 == 0 {
            return None;
        }
        self.0.checked_mul(numer.0).map(|p| Amount(p / denom.0))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a human-entered decimal string such as `"12.5"`.
    ///
    /// The fractional part is right-padded (or truncated) to exactly 18
    /// digits and combined as `whole * 10^18 + fraction`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::InvalidFormat(value.to_string());

        let (whole_str, fraction_str) = match value.split_once('.') {
            Some((w, f)) => (w, f),
            None => (value, ""),
        };

        if whole_str.is_empty() || !whole_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        // Digits were already validated, so the only way this parse fails
        // is a value past u128::MAX.
        let whole: u128 = whole_str.parse().map_err(|_| AmountError::Overflow)?;

        let mut padded = String::with_capacity(DECIMALS);
        padded.push_str(&fraction_str[..fraction_str.len().min(DECIMALS)]);
        while padded.len() < DECIMALS {
            padded.push('0');
        }
        let fraction: u128 = padded.parse().map_err(|_| invalid())?;

        whole
            .checked_mul(ATTOS_PER_TOKEN)
            .and_then(|w| w.checked_add(fraction))
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / ATTOS_PER_TOKEN;
        let fraction = self.0 % ATTOS_PER_TOKEN;

        if fraction == 0 {
            return write!(f, "{whole}");
        }

        let padded = format!("{fraction:018}");
        let trimmed = padded[..DISPLAY_FRACTION_DIGITS].trim_end_matches('0');
        if trimmed.is_empty() {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.{trimmed}")
        }
    }
}
