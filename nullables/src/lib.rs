//! Nullable chain seams — scripted in-memory stand-ins for the RPC read
//! client and the wallet bridge, for deterministic tests.

pub mod chain;
pub mod wallet;

pub use chain::NullChain;
pub use wallet::{NullWallet, RecordedWrite};
