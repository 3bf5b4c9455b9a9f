//! The read seam — everything the client learns from the chain.

use votelock_types::{LockupSlot, TokenAmount, WalletAddress};

use crate::error::ChainError;

/// Read-only contract state, polled by the session at a fixed interval.
///
/// Implemented by [`crate::EvmRpc`] in production and by the nullable chain
/// in tests.
#[allow(async_fn_in_trait)]
pub trait ContractReader: Send + Sync {
    /// Token balance of `owner`.
    async fn token_balance(&self, owner: WalletAddress) -> Result<TokenAmount, ChainError>;

    /// Remaining allowance `owner` has granted `spender` on the token.
    async fn token_allowance(
        &self,
        owner: WalletAddress,
        spender: WalletAddress,
    ) -> Result<TokenAmount, ChainError>;

    /// The address `owner`'s voting power is delegated to. The zero address
    /// means no delegation.
    async fn delegate_of(&self, owner: WalletAddress) -> Result<WalletAddress, ChainError>;

    /// The lockup slot at `(staker, index)`. An empty slot (zero amount)
    /// marks the end of the staker's lockup list.
    async fn lockup_at(&self, staker: WalletAddress, index: u64)
        -> Result<LockupSlot, ChainError>;
}
