//! Nullable contract reader — scripted state instead of `eth_call`.

use std::collections::HashMap;
use std::sync::Mutex;

use votelock_chain::{ChainError, ContractReader};
use votelock_types::{LockupSlot, Timestamp, TokenAmount, WalletAddress};

/// A test chain whose reads come from scripted state.
///
/// Unscripted state reads the way an empty chain would: zero balance, zero
/// allowance, zero-address delegate, and an empty slot at every lockup index
/// past the scripted list.
#[derive(Default)]
pub struct NullChain {
    balances: Mutex<HashMap<WalletAddress, TokenAmount>>,
    allowances: Mutex<HashMap<(WalletAddress, WalletAddress), TokenAmount>>,
    delegates: Mutex<HashMap<WalletAddress, WalletAddress>>,
    lockups: Mutex<HashMap<WalletAddress, Vec<LockupSlot>>>,
    /// Number of upcoming reads to fail.
    fail_reads: Mutex<u32>,
    /// Every lockup read issued, in order (for asserting cursor behavior).
    lockup_reads: Mutex<Vec<(WalletAddress, u64)>>,
}

impl NullChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, owner: WalletAddress, amount: TokenAmount) {
        self.balances.lock().unwrap().insert(owner, amount);
    }

    pub fn set_allowance(
        &self,
        owner: WalletAddress,
        spender: WalletAddress,
        amount: TokenAmount,
    ) {
        self.allowances
            .lock()
            .unwrap()
            .insert((owner, spender), amount);
    }

    pub fn set_delegate(&self, owner: WalletAddress, delegate: WalletAddress) {
        self.delegates.lock().unwrap().insert(owner, delegate);
    }

    /// Script the full lockup list for `staker`. Reads past the end of the
    /// list observe the terminating empty slot.
    pub fn set_lockups(&self, staker: WalletAddress, slots: Vec<LockupSlot>) {
        self.lockups.lock().unwrap().insert(staker, slots);
    }

    /// Fail the next `count` reads with a scripted RPC error.
    pub fn fail_next_reads(&self, count: u32) {
        *self.fail_reads.lock().unwrap() = count;
    }

    /// The lockup reads issued so far, in order.
    pub fn lockup_reads(&self) -> Vec<(WalletAddress, u64)> {
        self.lockup_reads.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), ChainError> {
        let mut remaining = self.fail_reads.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(ChainError::Rpc {
                code: -32000,
                message: "scripted read failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ContractReader for NullChain {
    async fn token_balance(&self, owner: WalletAddress) -> Result<TokenAmount, ChainError> {
        self.check_failure()?;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or(TokenAmount::ZERO))
    }

    async fn token_allowance(
        &self,
        owner: WalletAddress,
        spender: WalletAddress,
    ) -> Result<TokenAmount, ChainError> {
        self.check_failure()?;
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(owner, spender))
            .copied()
            .unwrap_or(TokenAmount::ZERO))
    }

    async fn delegate_of(&self, owner: WalletAddress) -> Result<WalletAddress, ChainError> {
        self.check_failure()?;
        Ok(self
            .delegates
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or(WalletAddress::ZERO))
    }

    async fn lockup_at(
        &self,
        staker: WalletAddress,
        index: u64,
    ) -> Result<LockupSlot, ChainError> {
        self.lockup_reads.lock().unwrap().push((staker, index));
        self.check_failure()?;
        let lockups = self.lockups.lock().unwrap();
        let slot = lockups
            .get(&staker)
            .and_then(|slots| slots.get(index as usize))
            .copied()
            .unwrap_or(LockupSlot {
                amount: TokenAmount::ZERO,
                end: Timestamp::EPOCH,
                votes: TokenAmount::ZERO,
            });
        Ok(slot)
    }
}
