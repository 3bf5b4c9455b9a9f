//! Chain seams for the votelock client.
//!
//! Everything that touches the outside world lives here:
//! - [`ContractReader`] and [`Wallet`] — the traits the core client is
//!   written against.
//! - [`EvmRpc`] — JSON-RPC reads (`eth_call`) against the configured
//!   RPC endpoint.
//! - [`RpcWallet`] — JSON-RPC writes through an externally-connected
//!   wallet endpoint. The wallet pairing handshake itself happens outside
//!   this crate; we only speak JSON-RPC to the resulting endpoint.
//! - [`codec`] — calldata encoding/decoding for the fixed seven-method
//!   surface of the token and voting contracts. Not a general ABI codec.

pub mod bridge;
pub mod codec;
pub mod error;
pub mod jsonrpc;
pub mod reader;
pub mod rpc;
pub mod wallet;

pub use bridge::RpcWallet;
pub use error::ChainError;
pub use reader::ContractReader;
pub use rpc::EvmRpc;
pub use wallet::Wallet;
