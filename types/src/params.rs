//! Contract parameters — the fixed addresses and constants of the deployment.

use alloy_primitives::address;
use serde::{Deserialize, Serialize};

use crate::address::WalletAddress;

/// The fixed on-chain surface the client talks to.
///
/// These are deployment constants, not user configuration: the token and
/// voting contract addresses, the chain they live on, and the protocol's
/// lockup conventions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractParams {
    /// ERC-20 token contract (balance, allowance, approve).
    pub token: WalletAddress,
    /// Voting/staking contract (lockups, extend, merge, delegates).
    pub voting: WalletAddress,
    /// Chain id the contracts are deployed on.
    pub chain_id: u64,
    /// Lockup id every extend call targets. Index 0 is the canonical lockup.
    pub lockup_id: u64,
    /// Extension duration in seconds: 4 years.
    pub extend_duration_secs: u64,
    /// Lockup-scan index past which a diagnostic is logged. The scan itself
    /// is unbounded; termination relies on the contract returning an empty
    /// slot at the end of the list.
    pub scan_warn_threshold: u64,
}

/// 4 years in seconds (4 × 365 × 24 × 60 × 60).
pub const EXTEND_DURATION_SECS: u64 = 126_144_000;

impl ContractParams {
    /// The Base mainnet deployment.
    pub fn base_mainnet() -> Self {
        Self {
            token: WalletAddress::new(address!("0x64b88c73A5DfA78D1713fE1b4c69a22d7E0faAa7")),
            voting: WalletAddress::new(address!("0x05b1b801191B41a21B9C0bFd4c4ef8952eb28cd9")),
            chain_id: 8453,
            lockup_id: 0,
            extend_duration_secs: EXTEND_DURATION_SECS,
            scan_warn_threshold: 1024,
        }
    }
}

impl Default for ContractParams {
    fn default() -> Self {
        Self::base_mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_mainnet_constants() {
        let params = ContractParams::base_mainnet();
        assert_eq!(params.chain_id, 8453);
        assert_eq!(params.lockup_id, 0);
        assert_eq!(params.extend_duration_secs, 126_144_000);
        assert_ne!(params.token, params.voting);
    }

    #[test]
    fn four_years_in_seconds() {
        assert_eq!(EXTEND_DURATION_SECS, 4 * 365 * 24 * 60 * 60);
    }
}
