//! Nullable wallet — records writes without submitting them.

use std::sync::Mutex;

use votelock_chain::{ChainError, Wallet};
use votelock_types::{TokenAmount, TxHash, WalletAddress};

/// One write the wallet was asked to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedWrite {
    Approve {
        spender: WalletAddress,
        amount: TokenAmount,
    },
    ExtendVotes {
        lockup_id: u64,
        duration_secs: u64,
        amount: TokenAmount,
    },
    Merge {
        indices: Vec<u64>,
    },
}

/// A test wallet that records writes instead of submitting them.
pub struct NullWallet {
    account: WalletAddress,
    chain: Mutex<u64>,
    writes: Mutex<Vec<RecordedWrite>>,
    switch_requests: Mutex<Vec<u64>>,
    reject_switch: Mutex<bool>,
    fail_approve: Mutex<bool>,
    fail_extend: Mutex<bool>,
    fail_merge: Mutex<bool>,
    next_hash: Mutex<u8>,
}

impl NullWallet {
    pub fn new(account: WalletAddress, chain_id: u64) -> Self {
        Self {
            account,
            chain: Mutex::new(chain_id),
            writes: Mutex::new(Vec::new()),
            switch_requests: Mutex::new(Vec::new()),
            reject_switch: Mutex::new(false),
            fail_approve: Mutex::new(false),
            fail_extend: Mutex::new(false),
            fail_merge: Mutex::new(false),
            next_hash: Mutex::new(0),
        }
    }

    /// All writes submitted so far, in submission order.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// Chain switch requests received so far.
    pub fn switch_requests(&self) -> Vec<u64> {
        self.switch_requests.lock().unwrap().clone()
    }

    /// Script the user rejecting any chain switch request.
    pub fn reject_switch(&self, reject: bool) {
        *self.reject_switch.lock().unwrap() = reject;
    }

    pub fn fail_approve(&self, fail: bool) {
        *self.fail_approve.lock().unwrap() = fail;
    }

    pub fn fail_extend(&self, fail: bool) {
        *self.fail_extend.lock().unwrap() = fail;
    }

    pub fn fail_merge(&self, fail: bool) {
        *self.fail_merge.lock().unwrap() = fail;
    }

    fn record(&self, write: RecordedWrite) -> TxHash {
        self.writes.lock().unwrap().push(write);
        let mut counter = self.next_hash.lock().unwrap();
        *counter += 1;
        TxHash::new([*counter; 32])
    }
}

impl Wallet for NullWallet {
    fn address(&self) -> WalletAddress {
        self.account
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(*self.chain.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        self.switch_requests.lock().unwrap().push(chain_id);
        if *self.reject_switch.lock().unwrap() {
            return Err(ChainError::Rejected(
                "user rejected chain switch".to_string(),
            ));
        }
        *self.chain.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn approve(
        &self,
        spender: WalletAddress,
        amount: TokenAmount,
    ) -> Result<TxHash, ChainError> {
        if *self.fail_approve.lock().unwrap() {
            return Err(ChainError::Rejected("approval rejected".to_string()));
        }
        Ok(self.record(RecordedWrite::Approve { spender, amount }))
    }

    async fn extend_votes(
        &self,
        lockup_id: u64,
        duration_secs: u64,
        amount: TokenAmount,
    ) -> Result<TxHash, ChainError> {
        if *self.fail_extend.lock().unwrap() {
            return Err(ChainError::Rejected("extend rejected".to_string()));
        }
        Ok(self.record(RecordedWrite::ExtendVotes {
            lockup_id,
            duration_secs,
            amount,
        }))
    }

    async fn merge(&self, indices: &[u64]) -> Result<TxHash, ChainError> {
        if *self.fail_merge.lock().unwrap() {
            return Err(ChainError::Rejected("merge rejected".to_string()));
        }
        Ok(self.record(RecordedWrite::Merge {
            indices: indices.to_vec(),
        }))
    }
}
