//! Token amount type.
//!
//! Rewards accrue in integer raw units (u128 fixed point) so no floating-point
//! rounding ever touches a balance. One whole token is [`TOKEN_UNIT`] raw units.
//! Clients speak decimal token strings ("0.01", "72"), so the type carries exact
//! decimal parsing and formatting alongside the checked arithmetic.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw units per whole token (10^12).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000;

/// Number of decimal places a token amount can carry.
pub const TOKEN_DECIMALS: u32 = 12;

/// A token amount, stored as raw units (u128) for precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// An amount of whole tokens.
    pub fn from_tokens(units: u128) -> Self {
        Self(units * TOKEN_UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Whole-token part, fractional raw discarded.
    pub fn to_tokens(&self) -> u128 {
        self.0 / TOKEN_UNIT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul_u64(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(u128::from(factor)).map(Self)
    }

    /// Parse a decimal token string ("72", "0.01", "1.8") into raw units.
    ///
    /// At most [`TOKEN_DECIMALS`] fractional digits are accepted; the value must be
    /// non-negative and fit in u128 raw units.
    pub fn parse_decimal(input: &str) -> Result<Self, TypeError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(TypeError::InvalidAmount("empty string".into()));
        }
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(TypeError::InvalidAmount(format!("not a number: {input:?}")));
        }
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(TypeError::InvalidAmount(format!("not a number: {input:?}")));
        }
        if frac_part.len() > TOKEN_DECIMALS as usize {
            return Err(TypeError::InvalidAmount(format!(
                "more than {TOKEN_DECIMALS} decimal places: {input:?}"
            )));
        }

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| TypeError::InvalidAmount(format!("integer part overflows: {input:?}")))?
        };
        let mut frac: u128 = if frac_part.is_empty() {
            0
        } else {
            // Fits: at most 12 digits.
            frac_part.parse().unwrap_or(0)
        };
        for _ in frac_part.len()..TOKEN_DECIMALS as usize {
            frac *= 10;
        }

        whole
            .checked_mul(TOKEN_UNIT)
            .and_then(|raw| raw.checked_add(frac))
            .map(Self)
            .ok_or_else(|| TypeError::InvalidAmount(format!("amount overflows: {input:?}")))
    }

    /// Format as a decimal token string with trailing fractional zeros trimmed.
    ///
    /// Exact inverse of [`parse_decimal`](Self::parse_decimal) for canonical input.
    pub fn to_decimal_string(&self) -> String {
        let whole = self.0 / TOKEN_UNIT;
        let frac = self.0 % TOKEN_UNIT;
        if frac == 0 {
            return whole.to_string();
        }
        let mut frac_str = format!("{:012}", frac);
        while frac_str.ends_with('0') {
            frac_str.pop();
        }
        format!("{whole}.{frac_str}")
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tokens", self.to_decimal_string())
    }
}
