//! JSON-RPC read client for the configured EVM endpoint.

use serde_json::json;

use votelock_types::{ContractParams, LockupSlot, TokenAmount, WalletAddress};

use crate::codec;
use crate::error::ChainError;
use crate::jsonrpc::{hex_bytes, hex_quantity, to_hex, JsonRpcClient};
use crate::reader::ContractReader;

/// Read client — typed `eth_call` wrappers over the RPC endpoint.
pub struct EvmRpc {
    rpc: JsonRpcClient,
    params: ContractParams,
}

impl EvmRpc {
    /// Create a read client targeting `rpc_url`.
    pub fn new(rpc_url: impl Into<String>, params: ContractParams) -> Result<Self, ChainError> {
        Ok(Self {
            rpc: JsonRpcClient::new(rpc_url)?,
            params,
        })
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc.url()
    }

    pub fn params(&self) -> &ContractParams {
        &self.params
    }

    /// The chain id the endpoint serves, for startup sanity checks.
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let result = self.rpc.call("eth_chainId", json!([])).await?;
        hex_quantity(&result)
    }

    /// `eth_call` against `to` with the given calldata, at the latest block.
    async fn call(&self, to: WalletAddress, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            { "to": to.to_string(), "data": to_hex(&data) },
            "latest",
        ]);
        let result = self.rpc.call("eth_call", params).await?;
        hex_bytes(&result)
    }
}

impl ContractReader for EvmRpc {
    async fn token_balance(&self, owner: WalletAddress) -> Result<TokenAmount, ChainError> {
        let data = self
            .call(self.params.token, codec::encode_balance_of(owner))
            .await?;
        codec::decode_amount(&data)
    }

    async fn token_allowance(
        &self,
        owner: WalletAddress,
        spender: WalletAddress,
    ) -> Result<TokenAmount, ChainError> {
        let data = self
            .call(self.params.token, codec::encode_allowance(owner, spender))
            .await?;
        codec::decode_amount(&data)
    }

    async fn delegate_of(&self, owner: WalletAddress) -> Result<WalletAddress, ChainError> {
        let data = self
            .call(self.params.voting, codec::encode_delegates(owner))
            .await?;
        codec::decode_address(&data)
    }

    async fn lockup_at(
        &self,
        staker: WalletAddress,
        index: u64,
    ) -> Result<LockupSlot, ChainError> {
        let data = self
            .call(self.params.voting, codec::encode_get_lockup(staker, index))
            .await?;
        codec::decode_lockup(&data)
    }
}
