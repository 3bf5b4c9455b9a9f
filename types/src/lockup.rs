//! Lockup slot — one on-chain locked-stake position.

use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::time::Timestamp;

/// A single lockup slot read from the voting contract at `(staker, index)`.
///
/// Immutable once read; slots are sourced from the chain, never constructed
/// by the client. A slot with zero `amount` marks the end of the staker's
/// lockup list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockupSlot {
    /// Staked token amount locked in this slot.
    pub amount: TokenAmount,
    /// Unlock time.
    pub end: Timestamp,
    /// Vote weight derived from amount and remaining lock duration.
    pub votes: TokenAmount,
}

impl LockupSlot {
    /// Whether this slot is the terminating empty slot.
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_iff_zero_amount() {
        let empty = LockupSlot {
            amount: TokenAmount::ZERO,
            end: Timestamp::new(9999),
            votes: TokenAmount::from_whole(5),
        };
        assert!(empty.is_empty());

        let live = LockupSlot {
            amount: TokenAmount::from_whole(1),
            end: Timestamp::EPOCH,
            votes: TokenAmount::ZERO,
        };
        assert!(!live.is_empty());
    }
}
