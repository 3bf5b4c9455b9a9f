//! JSON-RPC wallet bridge — writes through an externally-connected wallet.
//!
//! The wallet-connect pairing handshake happens outside this crate; by the
//! time [`RpcWallet::connect`] runs, the relay exposes a JSON-RPC endpoint
//! for the paired wallet. The project identifier rides along as an endpoint
//! parameter.

use serde_json::{json, Value};

use votelock_types::{ContractParams, TokenAmount, TxHash, WalletAddress};

use crate::codec;
use crate::error::ChainError;
use crate::jsonrpc::{hex_quantity, to_hex, JsonRpcClient};
use crate::wallet::Wallet;

/// Relay endpoint template for a wallet-connection project id.
const RELAY_URL: &str = "https://rpc.walletconnect.com/v1";

/// A wallet reached over JSON-RPC (`eth_accounts`, `eth_chainId`,
/// `wallet_switchEthereumChain`, `eth_sendTransaction`).
pub struct RpcWallet {
    rpc: JsonRpcClient,
    params: ContractParams,
    account: WalletAddress,
}

impl RpcWallet {
    /// The relay endpoint for a project id on the configured chain.
    pub fn relay_endpoint(project_id: &str, chain_id: u64) -> String {
        format!("{RELAY_URL}?chainId=eip155:{chain_id}&projectId={project_id}")
    }

    /// Connect to the wallet endpoint and resolve the active account via
    /// `eth_accounts`. Fails with [`ChainError::NoAccount`] when the wallet
    /// has no paired account.
    pub async fn connect(
        endpoint: impl Into<String>,
        params: ContractParams,
    ) -> Result<Self, ChainError> {
        let rpc = JsonRpcClient::new(endpoint)?;
        let result = rpc.call("eth_accounts", json!([])).await?;
        let account = first_account(&result)?;
        tracing::info!(account = %account.short(), "wallet connected");
        Ok(Self {
            rpc,
            params,
            account,
        })
    }

    async fn send_transaction(
        &self,
        to: WalletAddress,
        data: Vec<u8>,
    ) -> Result<TxHash, ChainError> {
        let params = json!([{
            "from": self.account.to_string(),
            "to": to.to_string(),
            "data": to_hex(&data),
        }]);
        let result = self.rpc.call("eth_sendTransaction", params).await?;
        let hash = result.as_str().ok_or_else(|| {
            ChainError::InvalidResponse(format!("expected tx hash string, got {result}"))
        })?;
        Ok(TxHash::parse(hash)?)
    }
}

fn first_account(result: &Value) -> Result<WalletAddress, ChainError> {
    let accounts = result
        .as_array()
        .ok_or_else(|| ChainError::InvalidResponse(format!("expected account list, got {result}")))?;
    let first = accounts
        .first()
        .and_then(Value::as_str)
        .ok_or(ChainError::NoAccount)?;
    Ok(WalletAddress::parse(first)?)
}

impl Wallet for RpcWallet {
    fn address(&self) -> WalletAddress {
        self.account
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        let result = self.rpc.call("eth_chainId", json!([])).await?;
        hex_quantity(&result)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        let params = json!([{ "chainId": format!("0x{chain_id:x}") }]);
        self.rpc.call("wallet_switchEthereumChain", params).await?;
        Ok(())
    }

    async fn approve(
        &self,
        spender: WalletAddress,
        amount: TokenAmount,
    ) -> Result<TxHash, ChainError> {
        self.send_transaction(self.params.token, codec::encode_approve(spender, amount))
            .await
    }

    async fn extend_votes(
        &self,
        lockup_id: u64,
        duration_secs: u64,
        amount: TokenAmount,
    ) -> Result<TxHash, ChainError> {
        self.send_transaction(
            self.params.voting,
            codec::encode_extend_for_sender(lockup_id, duration_secs, amount),
        )
        .await
    }

    async fn merge(&self, indices: &[u64]) -> Result<TxHash, ChainError> {
        self.send_transaction(self.params.voting, codec::encode_merge(indices))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_endpoint_carries_project_and_chain() {
        let url = RpcWallet::relay_endpoint("abc123", 8453);
        assert_eq!(
            url,
            "https://rpc.walletconnect.com/v1?chainId=eip155:8453&projectId=abc123"
        );
    }

    #[test]
    fn first_account_picks_head_of_list() {
        let result = json!(["0x64b88c73A5DfA78D1713fE1b4c69a22d7E0faAa7"]);
        let account = first_account(&result).unwrap();
        assert_eq!(
            account,
            WalletAddress::parse("0x64b88c73A5DfA78D1713fE1b4c69a22d7E0faAa7").unwrap()
        );
    }

    #[test]
    fn empty_account_list_is_no_account() {
        assert!(matches!(
            first_account(&json!([])),
            Err(ChainError::NoAccount)
        ));
    }

    #[test]
    fn non_list_result_is_invalid() {
        assert!(matches!(
            first_account(&json!("0xabc")),
            Err(ChainError::InvalidResponse(_))
        ));
    }
}
