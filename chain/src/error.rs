use thiserror::Error;

use votelock_types::TypesError;

/// JSON-RPC error code a wallet returns when the user rejects a request.
const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("request rejected by wallet: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no wallet account connected")]
    NoAccount,

    #[error(transparent)]
    Types(#[from] TypesError),
}

impl ChainError {
    /// Classify a JSON-RPC error object, mapping the EIP-1193 user-rejection
    /// code onto [`ChainError::Rejected`].
    pub fn from_rpc(code: i64, message: String) -> Self {
        if code == USER_REJECTED_CODE {
            Self::Rejected(message)
        } else {
            Self::Rpc { code, message }
        }
    }

    /// Whether this error is a user rejection rather than a fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
