//! Lockup aggregator — pages through a staker's lockup slots.
//!
//! The voting contract exposes lockups as an indexed list with no length
//! accessor; the end of the list is the first slot whose amount is zero.
//! The aggregator issues one read per increasing index, strictly
//! sequentially, and folds running totals as slots arrive. The terminating
//! empty slot is never appended.

use votelock_chain::{ChainError, ContractReader};
use votelock_types::{LockupSlot, Timestamp, TokenAmount, WalletAddress};

/// Result of feeding one fetched slot to the aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The slot held stake and was appended; the cursor advanced.
    Appended,
    /// The slot was empty; the list is exhausted for this address.
    Exhausted,
}

/// Incremental aggregate over a staker's lockup list.
///
/// Totals are always the fold of the appended slots: `total_votes` and
/// `total_staked` are sums, `latest_expiration` is the max `end`
/// ([`Timestamp::EPOCH`] while empty). They are maintained incrementally and
/// never mutated independently.
pub struct LockupAggregator {
    slots: Vec<LockupSlot>,
    next_index: u64,
    exhausted: bool,
    total_votes: TokenAmount,
    total_staked: TokenAmount,
    latest_expiration: Timestamp,
    /// Scan length past which a diagnostic is logged once per scan.
    warn_threshold: u64,
    warned: bool,
}

impl LockupAggregator {
    pub fn new(warn_threshold: u64) -> Self {
        Self {
            slots: Vec::new(),
            next_index: 0,
            exhausted: false,
            total_votes: TokenAmount::ZERO,
            total_staked: TokenAmount::ZERO,
            latest_expiration: Timestamp::EPOCH,
            warn_threshold,
            warned: false,
        }
    }

    /// Discard all aggregate state and restart the scan from index 0.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.next_index = 0;
        self.exhausted = false;
        self.total_votes = TokenAmount::ZERO;
        self.total_staked = TokenAmount::ZERO;
        self.latest_expiration = Timestamp::EPOCH;
        self.warned = false;
    }

    /// Feed the slot fetched at the current cursor position.
    ///
    /// An empty slot marks the list exhausted and is not appended; this is
    /// the sole termination condition. After exhaustion further observations
    /// are ignored.
    pub fn observe(&mut self, slot: LockupSlot) -> Observation {
        if self.exhausted || slot.is_empty() {
            self.exhausted = true;
            return Observation::Exhausted;
        }

        self.total_votes = self.total_votes.saturating_add(slot.votes);
        self.total_staked = self.total_staked.saturating_add(slot.amount);
        if slot.end > self.latest_expiration {
            self.latest_expiration = slot.end;
        }
        self.slots.push(slot);
        self.next_index += 1;

        if self.next_index >= self.warn_threshold && !self.warned {
            self.warned = true;
            tracing::warn!(
                index = self.next_index,
                "lockup scan passed {} slots without a terminating empty slot",
                self.warn_threshold
            );
        }

        Observation::Appended
    }

    /// Issue the single read at the cursor and fold the result.
    ///
    /// Returns `Ok(true)` while more slots remain. A failed read leaves the
    /// cursor where it was; the next call retries the same index.
    pub async fn scan_step<C: ContractReader>(
        &mut self,
        chain: &C,
        staker: WalletAddress,
    ) -> Result<bool, ChainError> {
        if self.exhausted {
            return Ok(false);
        }
        let slot = chain.lockup_at(staker, self.next_index).await?;
        Ok(self.observe(slot) == Observation::Appended)
    }

    /// Scan until the terminating empty slot or a read error. Reads are
    /// strictly sequential: index i+1 is requested only after index i's
    /// result has been folded.
    pub async fn scan<C: ContractReader>(
        &mut self,
        chain: &C,
        staker: WalletAddress,
    ) -> Result<(), ChainError> {
        while self.scan_step(chain, staker).await? {}
        Ok(())
    }

    pub fn slots(&self) -> &[LockupSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn total_votes(&self) -> TokenAmount {
        self.total_votes
    }

    pub fn total_staked(&self) -> TokenAmount {
        self.total_staked
    }

    pub fn latest_expiration(&self) -> Timestamp {
        self.latest_expiration
    }

    /// Merge candidates: every index above 0 holding stake. Index 0 is the
    /// canonical merge destination and is excluded.
    pub fn active_indices(&self) -> Vec<u64> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(index, slot)| *index > 0 && !slot.is_empty())
            .map(|(index, _)| index as u64)
            .collect()
    }
}

impl Default for LockupAggregator {
    fn default() -> Self {
        Self::new(votelock_types::ContractParams::base_mainnet().scan_warn_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use votelock_nullables::NullChain;

    fn slot(amount: u64, end: u64, votes: u64) -> LockupSlot {
        LockupSlot {
            amount: TokenAmount::from_whole(amount),
            end: Timestamp::new(end),
            votes: TokenAmount::from_whole(votes),
        }
    }

    fn empty_slot() -> LockupSlot {
        LockupSlot {
            amount: TokenAmount::ZERO,
            end: Timestamp::EPOCH,
            votes: TokenAmount::ZERO,
        }
    }

    fn staker() -> WalletAddress {
        WalletAddress::parse("0x05b1b801191B41a21B9C0bFd4c4ef8952eb28cd9").unwrap()
    }

    #[test]
    fn new_aggregator_is_empty() {
        let agg = LockupAggregator::new(1024);
        assert!(agg.is_empty());
        assert!(!agg.is_exhausted());
        assert_eq!(agg.next_index(), 0);
        assert_eq!(agg.total_staked(), TokenAmount::ZERO);
        assert_eq!(agg.total_votes(), TokenAmount::ZERO);
        assert_eq!(agg.latest_expiration(), Timestamp::EPOCH);
    }

    #[test]
    fn observe_folds_totals() {
        let mut agg = LockupAggregator::new(1024);
        assert_eq!(agg.observe(slot(100, 500, 40)), Observation::Appended);
        assert_eq!(agg.observe(slot(50, 300, 20)), Observation::Appended);

        assert_eq!(agg.total_staked(), TokenAmount::from_whole(150));
        assert_eq!(agg.total_votes(), TokenAmount::from_whole(60));
        assert_eq!(agg.latest_expiration(), Timestamp::new(500));
        assert_eq!(agg.next_index(), 2);
    }

    #[test]
    fn empty_slot_exhausts_and_is_not_appended() {
        let mut agg = LockupAggregator::new(1024);
        agg.observe(slot(100, 500, 40));
        assert_eq!(agg.observe(empty_slot()), Observation::Exhausted);

        assert!(agg.is_exhausted());
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.total_staked(), TokenAmount::from_whole(100));
        // Cursor stays where it was; no reads follow exhaustion.
        assert_eq!(agg.next_index(), 1);
    }

    #[test]
    fn first_slot_empty_means_no_lockups() {
        let mut agg = LockupAggregator::new(1024);
        assert_eq!(agg.observe(empty_slot()), Observation::Exhausted);
        assert!(agg.is_empty());
        assert_eq!(agg.latest_expiration(), Timestamp::EPOCH);
    }

    #[test]
    fn observations_after_exhaustion_are_ignored() {
        let mut agg = LockupAggregator::new(1024);
        agg.observe(empty_slot());
        assert_eq!(agg.observe(slot(100, 500, 40)), Observation::Exhausted);
        assert!(agg.is_empty());
    }

    #[test]
    fn active_indices_exclude_index_zero() {
        let mut agg = LockupAggregator::new(1024);
        agg.observe(slot(100, 500, 40));
        agg.observe(slot(50, 300, 20));
        agg.observe(slot(25, 400, 10));
        assert_eq!(agg.active_indices(), vec![1, 2]);
    }

    #[test]
    fn single_lockup_has_no_merge_candidates() {
        let mut agg = LockupAggregator::new(1024);
        agg.observe(slot(100, 500, 40));
        assert!(agg.active_indices().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut agg = LockupAggregator::new(1024);
        agg.observe(slot(100, 500, 40));
        agg.observe(empty_slot());
        agg.reset();

        assert!(agg.is_empty());
        assert!(!agg.is_exhausted());
        assert_eq!(agg.next_index(), 0);
        assert_eq!(agg.total_votes(), TokenAmount::ZERO);
        assert_eq!(agg.latest_expiration(), Timestamp::EPOCH);
    }

    #[tokio::test]
    async fn scan_reads_sequentially_until_empty_slot() {
        let chain = Arc::new(NullChain::new());
        chain.set_lockups(staker(), vec![slot(100, 500, 40), slot(50, 300, 20)]);

        let mut agg = LockupAggregator::new(1024);
        agg.scan(chain.as_ref(), staker()).await.unwrap();

        assert!(agg.is_exhausted());
        assert_eq!(agg.total_staked(), TokenAmount::from_whole(150));
        assert_eq!(agg.total_votes(), TokenAmount::from_whole(60));
        assert_eq!(agg.active_indices(), vec![1]);
        // Index 2 was read once (the terminating empty slot), nothing past it.
        assert_eq!(
            chain.lockup_reads(),
            vec![(staker(), 0), (staker(), 1), (staker(), 2)]
        );
    }

    #[tokio::test]
    async fn failed_read_does_not_advance_cursor() {
        let chain = NullChain::new();
        chain.set_lockups(staker(), vec![slot(100, 500, 40), slot(50, 300, 20)]);
        chain.fail_next_reads(1);

        let mut agg = LockupAggregator::new(1024);
        assert!(agg.scan(&chain, staker()).await.is_err());
        assert_eq!(agg.next_index(), 0);
        assert!(!agg.is_exhausted());

        // The retry resumes from the same index and completes.
        agg.scan(&chain, staker()).await.unwrap();
        assert_eq!(agg.total_staked(), TokenAmount::from_whole(150));
        assert_eq!(chain.lockup_reads()[0], (staker(), 0));
        assert_eq!(chain.lockup_reads()[1], (staker(), 0));
    }

    #[tokio::test]
    async fn mid_list_failure_resumes_mid_list() {
        let chain = NullChain::new();
        chain.set_lockups(staker(), vec![slot(100, 500, 40), slot(50, 300, 20)]);

        let mut agg = LockupAggregator::new(1024);
        assert!(agg.scan_step(&chain, staker()).await.unwrap());

        chain.fail_next_reads(1);
        assert!(agg.scan(&chain, staker()).await.is_err());
        assert_eq!(agg.next_index(), 1);
        assert_eq!(agg.total_staked(), TokenAmount::from_whole(100));

        agg.scan(&chain, staker()).await.unwrap();
        assert_eq!(agg.total_staked(), TokenAmount::from_whole(150));
    }

    #[test]
    fn scan_past_warn_threshold_keeps_going() {
        let mut agg = LockupAggregator::new(3);
        for i in 0..10 {
            assert_eq!(agg.observe(slot(1, i, 1)), Observation::Appended);
        }
        assert_eq!(agg.len(), 10);
        assert!(!agg.is_exhausted());
    }
}
