//! Token amount type.
//!
//! Amounts are raw uint256 values in the token's smallest unit. The token uses
//! the standard 18-decimal fixed-point convention; [`TokenAmount::parse_units`]
//! and [`TokenAmount::format_units`] convert between raw units and the decimal
//! strings users see.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::TypesError;

/// Number of fractional digits in the token's fixed-point convention.
pub const TOKEN_DECIMALS: u32 = 18;

/// A token amount in raw (smallest-unit) uint256 units.
///
/// Used for balances, allowances, staked amounts, and vote weights alike.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    /// The maximum representable amount. Used for one-time max approvals.
    pub const MAX: Self = Self(U256::MAX);

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// One whole token (10^18 raw units).
    fn unit() -> U256 {
        U256::from(10u64.pow(TOKEN_DECIMALS))
    }

    /// Convert a whole number of tokens into raw units.
    pub fn from_whole(units: u64) -> Self {
        Self(U256::from(units) * Self::unit())
    }

    /// Parse a decimal token string (e.g. `"10"`, `"0.5"`) into raw units.
    ///
    /// Accepts an optional fractional part of at most [`TOKEN_DECIMALS`]
    /// digits. Signs, exponents, separators, and empty strings are rejected.
    /// `"0"` parses successfully; callers validating user input enforce
    /// positivity themselves.
    pub fn parse_units(input: &str) -> Result<Self, TypesError> {
        let invalid = |reason: &str| TypesError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty string"));
        }

        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("not a decimal number"));
        }
        if frac_part.len() > TOKEN_DECIMALS as usize {
            return Err(invalid("too many fractional digits"));
        }

        let whole = if int_part.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(int_part, 10).map_err(|_| TypesError::AmountOverflow)?
        };

        // Right-pad the fractional digits to the full 18-digit width.
        let frac = if frac_part.is_empty() {
            U256::ZERO
        } else {
            let padded = format!("{frac_part:0<width$}", width = TOKEN_DECIMALS as usize);
            U256::from_str_radix(&padded, 10).map_err(|_| TypesError::AmountOverflow)?
        };

        whole
            .checked_mul(Self::unit())
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or(TypesError::AmountOverflow)
    }

    /// Format raw units as a decimal token string, trailing zeros trimmed.
    pub fn format_units(&self) -> String {
        let unit = Self::unit();
        let whole = self.0 / unit;
        let frac = self.0 % unit;
        if frac.is_zero() {
            return whole.to_string();
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = TOKEN_DECIMALS as usize);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }

    /// The whole-token part, fractional digits dropped.
    pub fn whole_units(&self) -> U256 {
        self.0 / Self::unit()
    }

    /// Format with at most `places` fractional digits (truncated, not rounded).
    pub fn format_short(&self, places: usize) -> String {
        let places = places.min(TOKEN_DECIMALS as usize);
        let unit = Self::unit();
        let whole = self.0 / unit;
        let frac = self.0 % unit;
        if places == 0 || frac.is_zero() {
            return whole.to_string();
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = TOKEN_DECIMALS as usize);
        format!("{whole}.{}", &digits[..places])
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl From<U256> for TokenAmount {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_units())
    }
}
