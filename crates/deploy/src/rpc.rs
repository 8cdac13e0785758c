//! JSON-RPC chain client backed by an HTTP endpoint.

use std::time::{Duration, Instant};

use alloy_core::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::chain::{ChainClient, ChainError, PendingDeployment};

/// Default timeout for a single RPC request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between receipt polling attempts.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default window to wait for a submitted transaction to be included.
const DEFAULT_CONFIRMATION_WINDOW: Duration = Duration::from_secs(120);

/// [`ChainClient`] implementation talking to an Ethereum JSON-RPC endpoint
/// over HTTP.
///
/// Transactions are signed by the node itself, so the endpoint must manage
/// at least one unlocked account (Hardhat and Ganache dev nodes do).
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    url: Url,
    poll_interval: Duration,
    confirmation_window: Duration,
}

impl RpcClient {
    /// Create a client for the given endpoint URL.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ChainError> {
        let raw = url.as_ref();
        let url = Url::parse(raw)
            .map_err(|e| ChainError::Transport(format!("Invalid endpoint URL '{}': {}", raw, e)))?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChainError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmation_window: DEFAULT_CONFIRMATION_WINDOW,
        })
    }

    /// Override how long [`ChainClient::wait_for_inclusion`] polls before
    /// giving up.
    pub fn confirmation_window(mut self, window: Duration) -> Self {
        self.confirmation_window = window;
        self
    }

    /// Make a JSON-RPC call and deserialize the result.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, ChainError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1
            }))
            .send()
            .await
            .map_err(|e| {
                ChainError::Transport(format!("Failed to send {} request: {}", method, e))
            })?;

        let result: Value = response.json().await.map_err(|e| {
            ChainError::Transport(format!("Failed to parse {} response: {}", method, e))
        })?;

        if let Some(error) = result.get("error") {
            return Err(ChainError::Transport(format!(
                "RPC error: {}",
                error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown")
            )));
        }

        let result_value = result
            .get("result")
            .ok_or_else(|| ChainError::Transport(format!("No result in {} response", method)))?
            .clone();

        serde_json::from_value(result_value).map_err(|e| {
            ChainError::Transport(format!("Failed to deserialize {} result: {}", method, e))
        })
    }
}

/// The subset of a transaction receipt the deployment flow reads.
#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    #[serde(rename = "contractAddress")]
    contract_address: Option<Address>,
    status: Option<String>,
}

/// Parse a JSON-RPC quantity (`"0x539"`) into a `u64`.
fn parse_hex_u64(raw: &str) -> Result<u64, ChainError> {
    u64::from_str_radix(raw.trim_start_matches("0x"), 16)
        .map_err(|e| ChainError::Transport(format!("Invalid hex quantity '{}': {}", raw, e)))
}

/// Decide the deployment outcome from an included transaction's receipt.
///
/// A reverted transaction and a receipt with no contract address both count
/// as failed inclusion, not as a timeout.
fn evaluate_receipt(receipt: TransactionReceipt, tx_hash: B256) -> Result<Address, ChainError> {
    if receipt.status.as_deref() == Some("0x0") {
        return Err(ChainError::Transport(format!(
            "Transaction {} reverted",
            tx_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ChainError::Transport(format!(
            "Receipt for {} carries no contract address",
            tx_hash
        ))
    })
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        let raw: String = self.call("eth_chainId", vec![]).await?;
        parse_hex_u64(&raw)
    }

    async fn balance_of(&self, address: Address) -> Result<U256, ChainError> {
        let raw: String = self
            .call("eth_getBalance", vec![json!(address), json!("latest")])
            .await?;
        U256::from_str_radix(raw.trim_start_matches("0x"), 16)
            .map_err(|e| ChainError::Transport(format!("Invalid balance '{}': {}", raw, e)))
    }

    async fn default_account(&self) -> Result<Address, ChainError> {
        let accounts: Vec<Address> = self.call("eth_accounts", vec![]).await?;
        accounts.into_iter().next().ok_or_else(|| {
            ChainError::Transport("The endpoint exposes no unlocked accounts".into())
        })
    }

    async fn submit_deployment(
        &self,
        from: Address,
        bytecode: &Bytes,
    ) -> Result<PendingDeployment, ChainError> {
        // No `to` field: this is a contract creation. The node signs with its
        // unlocked account and estimates gas.
        let tx_hash: B256 = self
            .call(
                "eth_sendTransaction",
                vec![json!({
                    "from": from,
                    "data": bytecode,
                })],
            )
            .await?;

        Ok(PendingDeployment { tx_hash })
    }

    async fn wait_for_inclusion(&self, pending: PendingDeployment) -> Result<Address, ChainError> {
        let tx_hash = pending.tx_hash;
        let start = Instant::now();

        loop {
            if start.elapsed() > self.confirmation_window {
                return Err(ChainError::Timeout(self.confirmation_window.as_secs()));
            }

            let receipt: Option<TransactionReceipt> = self
                .call("eth_getTransactionReceipt", vec![json!(tx_hash)])
                .await?;

            match receipt {
                Some(receipt) => return evaluate_receipt(receipt, tx_hash),
                None => {
                    tracing::trace!(tx_hash = %tx_hash, "Transaction not yet included, retrying...");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        let raw: String = self
            .call("eth_getCode", vec![json!(address), json!("latest")])
            .await?;
        raw.parse::<Bytes>()
            .map_err(|e| ChainError::Transport(format!("Invalid code payload '{}': {}", raw, e)))
    }
}
