//! The write seam — the externally-connected wallet.

use votelock_types::{TokenAmount, TxHash, WalletAddress};

use crate::error::ChainError;

/// A connected wallet that signs and submits the client's three writes.
///
/// Write methods resolve when the wallet accepts the transaction and returns
/// its hash; there is no confirmation-depth tracking. Implemented by
/// [`crate::RpcWallet`] in production and by the nullable wallet in tests.
#[allow(async_fn_in_trait)]
pub trait Wallet: Send + Sync {
    /// The connected account.
    fn address(&self) -> WalletAddress;

    /// The chain the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Ask the wallet to switch to `chain_id`. The user may reject this.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError>;

    /// `approve(spender, amount)` on the token contract.
    async fn approve(
        &self,
        spender: WalletAddress,
        amount: TokenAmount,
    ) -> Result<TxHash, ChainError>;

    /// `extendForSender(lockup_id, duration, amount)` on the voting contract.
    async fn extend_votes(
        &self,
        lockup_id: u64,
        duration_secs: u64,
        amount: TokenAmount,
    ) -> Result<TxHash, ChainError>;

    /// `merge(indices)` on the voting contract.
    async fn merge(&self, indices: &[u64]) -> Result<TxHash, ChainError>;
}
