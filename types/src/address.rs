//! EVM wallet address type.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A 20-byte EVM wallet address.
///
/// Displays in EIP-55 checksummed form. The all-zero address is used by the
/// voting contract to mean "no delegate".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(Address);

impl WalletAddress {
    /// The all-zero address.
    pub const ZERO: Self = Self(Address::ZERO);

    pub fn new(raw: Address) -> Self {
        Self(raw)
    }

    /// Parse a `0x`-prefixed hex address.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        Address::from_str(s)
            .map(Self)
            .map_err(|e| TypesError::InvalidAddress(format!("{s}: {e}")))
    }

    pub fn raw(&self) -> Address {
        self.0
    }

    /// Whether this is the all-zero ("no delegate") address.
    pub fn is_zero(&self) -> bool {
        self.0 == Address::ZERO
    }

    /// Shortened `0xabcd…ef12` form for log lines and display.
    pub fn short(&self) -> String {
        let full = self.0.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Address> for WalletAddress {
    fn from(raw: Address) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x64b88c73A5DfA78D1713fE1b4c69a22d7E0faAa7";

    #[test]
    fn parse_and_display_round_trip() {
        let addr = WalletAddress::parse(TOKEN).unwrap();
        assert_eq!(addr.to_string(), TOKEN);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(WalletAddress::parse("not an address").is_err());
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse("").is_err());
    }

    #[test]
    fn zero_address_is_zero() {
        assert!(WalletAddress::ZERO.is_zero());
        assert!(!WalletAddress::parse(TOKEN).unwrap().is_zero());
    }

    #[test]
    fn short_form() {
        let addr = WalletAddress::parse(TOKEN).unwrap();
        assert_eq!(addr.short(), "0x64b8…aAa7");
    }
}
