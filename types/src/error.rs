//! Shared error type for the fundamental types.

use thiserror::Error;

/// Errors produced while parsing or converting the fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("amount overflows uint256")]
    AmountOverflow,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),
}
