//! Minimal JSON-RPC 2.0 HTTP transport shared by the read client and the
//! wallet bridge.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ChainError;

/// Request timeout for a single RPC round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// A JSON-RPC 2.0 client over HTTP POST.
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and return its `result` field.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let response = self.http.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::InvalidResponse(format!(
                "endpoint returned HTTP {status}"
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(format!("malformed JSON-RPC body: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(ChainError::from_rpc(err.code, err.message));
        }
        // A JSON `null` result (e.g. wallet_switchEthereumChain) is success.
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

/// Decode a `0x`-prefixed hex result into raw bytes.
pub fn hex_bytes(value: &Value) -> Result<Vec<u8>, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("expected hex string, got {value}")))?;
    let stripped = s
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::InvalidResponse(format!("missing 0x prefix: {s}")))?;
    hex::decode(stripped).map_err(|e| ChainError::InvalidResponse(format!("bad hex {s}: {e}")))
}

/// Decode a `0x`-prefixed hex quantity (e.g. a chain id) into a u64.
pub fn hex_quantity(value: &Value) -> Result<u64, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("expected hex string, got {value}")))?;
    let stripped = s
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::InvalidResponse(format!("missing 0x prefix: {s}")))?;
    u64::from_str_radix(stripped, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("bad quantity {s}: {e}")))
}

/// Format bytes as a `0x`-prefixed hex string for request parameters.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
