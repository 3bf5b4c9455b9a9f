//! Fundamental types for the votelock client.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, token amounts, timestamps, transaction hashes, lockup slots, and the
//! fixed contract parameters.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod lockup;
pub mod params;
pub mod time;

pub use address::WalletAddress;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use hash::TxHash;
pub use lockup::LockupSlot;
pub use params::ContractParams;
pub use time::Timestamp;

pub use alloy_primitives::U256;
