//! Transaction sequencer — the approve→extend and merge→extend flows.
//!
//! Both interactions are pairs of dependent writes: adding stake may first
//! require a token approval, and re-anchoring merged lockups requires the
//! merge before the extension. Each flow is a straight-line async sequence;
//! a phase enum tracks which external call is pending, and any failure
//! returns the sequencer to `Idle` with nothing retained.

use votelock_chain::{ContractReader, Wallet};
use votelock_types::{ContractParams, TokenAmount, TxHash};

use crate::error::ClientError;

/// Which external call the sequencer is currently waiting on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    CheckingAllowance,
    Approving,
    Merging,
    ExtendingVotes,
}

/// Outcome of a successful extend submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendReceipt {
    /// The approval transaction, when one was needed.
    pub approved: Option<TxHash>,
    /// The vote-extension transaction.
    pub extended: TxHash,
    /// The raw amount that was staked.
    pub amount: TokenAmount,
}

/// Outcome of a successful merge-and-extend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReceipt {
    pub merged: TxHash,
    pub extended: TxHash,
    /// The lockup indices that were merged into index 0.
    pub indices: Vec<u64>,
}

/// Sequences the client's writes through a connected wallet.
pub struct VoteSequencer<W> {
    wallet: W,
    params: ContractParams,
    phase: SubmitPhase,
}

impl<W: Wallet> VoteSequencer<W> {
    pub fn new(wallet: W, params: ContractParams) -> Self {
        Self {
            wallet,
            params,
            phase: SubmitPhase::Idle,
        }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Submit a user-entered amount: validate, ensure the right chain, then
    /// approve (if the allowance does not cover it) and extend.
    ///
    /// Validation failures reject before any external call. The approval is
    /// for the maximum uint256 value, so later submissions skip it entirely.
    pub async fn submit_extend<C: ContractReader>(
        &mut self,
        reader: &C,
        input: &str,
    ) -> Result<ExtendReceipt, ClientError> {
        let amount = parse_positive_amount(input)?;
        let result = self.extend_flow(reader, amount).await;
        self.phase = SubmitPhase::Idle;
        result
    }

    async fn extend_flow<C: ContractReader>(
        &mut self,
        reader: &C,
        amount: TokenAmount,
    ) -> Result<ExtendReceipt, ClientError> {
        self.ensure_chain().await?;

        self.phase = SubmitPhase::CheckingAllowance;
        let owner = self.wallet.address();
        // An unreadable allowance selects the approve path, same as an
        // insufficient one; the max approval is idempotent either way.
        let allowance = match reader.token_allowance(owner, self.params.voting).await {
            Ok(allowance) => Some(allowance),
            Err(e) => {
                tracing::debug!("allowance read failed, assuming approval needed: {e}");
                None
            }
        };

        let approved = if allowance.is_none_or(|a| a < amount) {
            self.phase = SubmitPhase::Approving;
            let tx = self
                .wallet
                .approve(self.params.voting, TokenAmount::MAX)
                .await
                .map_err(ClientError::Approve)?;
            tracing::info!(tx = %tx, "max approval submitted");
            Some(tx)
        } else {
            None
        };

        self.phase = SubmitPhase::ExtendingVotes;
        let extended = self
            .wallet
            .extend_votes(
                self.params.lockup_id,
                self.params.extend_duration_secs,
                amount,
            )
            .await
            .map_err(ClientError::Extend)?;
        tracing::info!(tx = %extended, amount = %amount, "votes extended");

        Ok(ExtendReceipt {
            approved,
            extended,
            amount,
        })
    }

    /// Merge every active lockup into index 0, then extend the merged lockup
    /// to the full duration without adding funds.
    ///
    /// An empty index list is an error and performs zero writes.
    pub async fn merge_and_extend(
        &mut self,
        active_indices: &[u64],
    ) -> Result<MergeReceipt, ClientError> {
        if active_indices.is_empty() {
            return Err(ClientError::NothingToMerge);
        }
        let result = self.merge_flow(active_indices).await;
        self.phase = SubmitPhase::Idle;
        result
    }

    async fn merge_flow(&mut self, indices: &[u64]) -> Result<MergeReceipt, ClientError> {
        self.ensure_chain().await?;

        self.phase = SubmitPhase::Merging;
        let merged = self
            .wallet
            .merge(indices)
            .await
            .map_err(ClientError::Merge)?;
        tracing::info!(tx = %merged, count = indices.len(), "lockups merged");

        self.phase = SubmitPhase::ExtendingVotes;
        let extended = self
            .wallet
            .extend_votes(
                self.params.lockup_id,
                self.params.extend_duration_secs,
                TokenAmount::ZERO,
            )
            .await
            .map_err(ClientError::Extend)?;
        tracing::info!(tx = %extended, "merged lockup re-anchored");

        Ok(MergeReceipt {
            merged,
            extended,
            indices: indices.to_vec(),
        })
    }

    /// Verify the wallet is on the configured chain, requesting a switch
    /// when it is not. A refused switch aborts the submission.
    async fn ensure_chain(&self) -> Result<(), ClientError> {
        let actual = self
            .wallet
            .chain_id()
            .await
            .map_err(ClientError::ChainUnavailable)?;
        if actual == self.params.chain_id {
            return Ok(());
        }
        tracing::info!(actual, expected = self.params.chain_id, "requesting chain switch");
        self.wallet
            .switch_chain(self.params.chain_id)
            .await
            .map_err(|source| ClientError::ChainSwitchRejected {
                expected: self.params.chain_id,
                actual,
                source,
            })
    }
}

/// Validate a user-entered amount: a positive decimal token string.
fn parse_positive_amount(input: &str) -> Result<TokenAmount, ClientError> {
    let amount = TokenAmount::parse_units(input).map_err(ClientError::InvalidAmount)?;
    if amount.is_zero() {
        return Err(ClientError::NonPositiveAmount);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use votelock_nullables::{NullChain, NullWallet, RecordedWrite};
    use votelock_types::WalletAddress;

    const FOUR_YEARS: u64 = 126_144_000;

    fn owner() -> WalletAddress {
        WalletAddress::parse("0x64b88c73A5DfA78D1713fE1b4c69a22d7E0faAa7").unwrap()
    }

    fn sequencer(chain_id: u64) -> VoteSequencer<NullWallet> {
        VoteSequencer::new(
            NullWallet::new(owner(), chain_id),
            ContractParams::base_mainnet(),
        )
    }

    fn voting() -> WalletAddress {
        ContractParams::base_mainnet().voting
    }

    #[tokio::test]
    async fn low_allowance_approves_then_extends() {
        let chain = NullChain::new();
        chain.set_allowance(owner(), voting(), TokenAmount::from_whole(5));

        let mut seq = sequencer(8453);
        let receipt = seq.submit_extend(&chain, "10").await.unwrap();

        assert!(receipt.approved.is_some());
        assert_eq!(
            seq.wallet().writes(),
            vec![
                RecordedWrite::Approve {
                    spender: voting(),
                    amount: TokenAmount::MAX,
                },
                RecordedWrite::ExtendVotes {
                    lockup_id: 0,
                    duration_secs: FOUR_YEARS,
                    amount: TokenAmount::from_whole(10),
                },
            ]
        );
        assert_eq!(seq.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn sufficient_allowance_skips_approval() {
        let chain = NullChain::new();
        chain.set_allowance(owner(), voting(), TokenAmount::from_whole(100));

        let mut seq = sequencer(8453);
        let receipt = seq.submit_extend(&chain, "10").await.unwrap();

        assert!(receipt.approved.is_none());
        assert_eq!(
            seq.wallet().writes(),
            vec![RecordedWrite::ExtendVotes {
                lockup_id: 0,
                duration_secs: FOUR_YEARS,
                amount: TokenAmount::from_whole(10),
            }]
        );
    }

    #[tokio::test]
    async fn exact_allowance_is_sufficient() {
        let chain = NullChain::new();
        chain.set_allowance(owner(), voting(), TokenAmount::from_whole(10));

        let mut seq = sequencer(8453);
        let receipt = seq.submit_extend(&chain, "10").await.unwrap();
        assert!(receipt.approved.is_none());
    }

    #[tokio::test]
    async fn unreadable_allowance_takes_approve_path() {
        let chain = NullChain::new();
        chain.fail_next_reads(1);

        let mut seq = sequencer(8453);
        let receipt = seq.submit_extend(&chain, "1").await.unwrap();
        assert!(receipt.approved.is_some());
    }

    #[tokio::test]
    async fn invalid_amount_rejected_before_any_call() {
        let chain = NullChain::new();
        let mut seq = sequencer(8453);

        for bad in ["", "abc", "-1", "1e5"] {
            assert!(matches!(
                seq.submit_extend(&chain, bad).await,
                Err(ClientError::InvalidAmount(_))
            ));
        }
        assert!(matches!(
            seq.submit_extend(&chain, "0").await,
            Err(ClientError::NonPositiveAmount)
        ));
        assert!(seq.wallet().writes().is_empty());
        assert!(seq.wallet().switch_requests().is_empty());
    }

    #[tokio::test]
    async fn failed_approval_halts_the_sequence() {
        let chain = NullChain::new();
        let mut seq = sequencer(8453);
        seq.wallet().fail_approve(true);

        let err = seq.submit_extend(&chain, "10").await.unwrap_err();
        assert!(matches!(err, ClientError::Approve(_)));
        assert!(seq.wallet().writes().is_empty());
        assert_eq!(seq.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn failed_extension_reports_error() {
        let chain = NullChain::new();
        chain.set_allowance(owner(), voting(), TokenAmount::from_whole(100));

        let mut seq = sequencer(8453);
        seq.wallet().fail_extend(true);

        let err = seq.submit_extend(&chain, "10").await.unwrap_err();
        assert!(matches!(err, ClientError::Extend(_)));
        assert_eq!(seq.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn wrong_chain_triggers_switch_then_proceeds() {
        let chain = NullChain::new();
        chain.set_allowance(owner(), voting(), TokenAmount::from_whole(100));

        let mut seq = sequencer(1);
        let receipt = seq.submit_extend(&chain, "10").await.unwrap();

        assert_eq!(seq.wallet().switch_requests(), vec![8453]);
        assert_eq!(receipt.amount, TokenAmount::from_whole(10));
    }

    #[tokio::test]
    async fn refused_switch_aborts_with_no_writes() {
        let chain = NullChain::new();
        let mut seq = sequencer(1);
        seq.wallet().reject_switch(true);

        let err = seq.submit_extend(&chain, "10").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ChainSwitchRejected {
                expected: 8453,
                actual: 1,
                ..
            }
        ));
        assert!(seq.wallet().writes().is_empty());
    }

    #[tokio::test]
    async fn merge_then_extend_with_zero_amount() {
        let mut seq = sequencer(8453);
        let receipt = seq.merge_and_extend(&[1, 2]).await.unwrap();

        assert_eq!(receipt.indices, vec![1, 2]);
        assert_eq!(
            seq.wallet().writes(),
            vec![
                RecordedWrite::Merge { indices: vec![1, 2] },
                RecordedWrite::ExtendVotes {
                    lockup_id: 0,
                    duration_secs: FOUR_YEARS,
                    amount: TokenAmount::ZERO,
                },
            ]
        );
    }

    #[tokio::test]
    async fn empty_merge_list_is_an_error_with_zero_writes() {
        let mut seq = sequencer(8453);
        let err = seq.merge_and_extend(&[]).await.unwrap_err();
        assert!(matches!(err, ClientError::NothingToMerge));
        assert!(seq.wallet().writes().is_empty());
        assert!(seq.wallet().switch_requests().is_empty());
    }

    #[tokio::test]
    async fn failed_merge_issues_no_extension() {
        let mut seq = sequencer(8453);
        seq.wallet().fail_merge(true);

        let err = seq.merge_and_extend(&[1]).await.unwrap_err();
        assert!(matches!(err, ClientError::Merge(_)));
        assert!(seq.wallet().writes().is_empty());
    }

    #[tokio::test]
    async fn repeated_submissions_after_approval_skip_it() {
        // Simulates the one-time max approval: once granted, later
        // submissions go straight to the extension.
        let chain = NullChain::new();
        let mut seq = sequencer(8453);

        let first = seq.submit_extend(&chain, "10").await.unwrap();
        assert!(first.approved.is_some());

        chain.set_allowance(owner(), voting(), TokenAmount::MAX);
        let second = seq.submit_extend(&chain, "10").await.unwrap();
        assert!(second.approved.is_none());
    }
}
