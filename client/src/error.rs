use thiserror::Error;

use votelock_chain::ChainError;
use votelock_types::TypesError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid amount: {0}")]
    InvalidAmount(TypesError),

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("no additional lockups to merge")]
    NothingToMerge,

    #[error("could not determine wallet chain: {0}")]
    ChainUnavailable(#[source] ChainError),

    #[error("wallet is on chain {actual}, switch to chain {expected} failed: {source}")]
    ChainSwitchRejected {
        expected: u64,
        actual: u64,
        #[source]
        source: ChainError,
    },

    #[error("approval failed: {0}")]
    Approve(#[source] ChainError),

    #[error("vote extension failed: {0}")]
    Extend(#[source] ChainError),

    #[error("merge failed: {0}")]
    Merge(#[source] ChainError),

    #[error("read failed: {0}")]
    Read(#[from] ChainError),

    #[error("config error: {0}")]
    Config(String),
}
