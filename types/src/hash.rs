//! Transaction hash type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// A 32-byte transaction hash returned by the wallet for a submitted write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed 64-digit hex string.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| TypesError::InvalidHash(format!("{s}: missing 0x prefix")))?;
        let bytes =
            hex::decode(hex_part).map_err(|e| TypesError::InvalidHash(format!("{s}: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TypesError::InvalidHash(format!("{s}: wrong length")))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_round_trip() {
        let hex = format!("0x{}", "ab".repeat(32));
        let hash = TxHash::parse(&hex).unwrap();
        assert_eq!(hash.to_string(), hex);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(TxHash::parse("ab".repeat(32).as_str()).is_err()); // no prefix
        assert!(TxHash::parse("0x1234").is_err()); // wrong length
        assert!(TxHash::parse("0xzz").is_err()); // not hex
    }

    #[test]
    fn zero_hash() {
        assert!(TxHash::ZERO.is_zero());
        assert!(!TxHash::new([1u8; 32]).is_zero());
    }
}
