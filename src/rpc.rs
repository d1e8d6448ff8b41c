use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use alloy_primitives::Address;
use alloy_sol_types::{sol, Revert, SolCall, SolError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::codec::EncodedWords;
use crate::error::{Result, VerifierError};
use crate::verifier::VerifyEndpoint;

sol! {
    function verify(uint256[] proof, uint256[] target) external returns (bool);
}

/// JSON-RPC error code geth and anvil use for reverted calls.
const REVERT_ERROR_CODE: i64 = 3;

#[derive(Debug, Clone)]
pub struct RpcEndpointConfig {
    pub url: String,
    pub verifier: Address,
    /// When set, `execute` also sends a transaction from this account.
    pub sender: Option<Address>,
    pub gas_limit: Option<u64>,
    pub timeout: Duration,
    pub receipt_poll_interval: Duration,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// `verify` on a deployed contract, reached over Ethereum JSON-RPC.
pub struct RpcEndpoint {
    client: reqwest::Client,
    config: RpcEndpointConfig,
    next_id: AtomicU64,
}

impl RpcEndpoint {
    pub fn new(config: RpcEndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VerifierError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// ABI-encode `verify(args[0], args[1])`.
    pub fn calldata(args: &[EncodedWords]) -> Result<Vec<u8>> {
        let [proof, target] = args else {
            return Err(VerifierError::InvalidConfig(format!(
                "verify takes 2 arguments, the call layout supplies {}",
                args.len()
            )));
        };
        Ok(verifyCall {
            proof: proof.clone(),
            target: target.clone(),
        }
        .abi_encode())
    }

    fn transaction(&self, data: &[u8], with_gas: bool) -> Value {
        let mut tx = json!({
            "to": self.config.verifier.to_string(),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(sender) = self.config.sender {
            tx["from"] = json!(sender.to_string());
        }
        if with_gas {
            if let Some(gas) = self.config.gas_limit {
                tx["gas"] = json!(format!("0x{:x}", gas));
            }
        }
        tx
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                VerifierError::EndpointUnavailable(format!(
                    "{} request to {} failed: {}",
                    method, self.config.url, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(VerifierError::EndpointUnavailable(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let response: RpcResponse = response.json().await.map_err(|e| {
            VerifierError::EndpointUnavailable(format!("Invalid {} response: {}", method, e))
        })?;

        match response.error {
            Some(error) => Err(classify_rpc_error(method, error)),
            None => Ok(response.result),
        }
    }

    /// Send the call as a transaction and wait for it to be mined.
    async fn commit(&self, data: &[u8]) -> Result<()> {
        let hash = self
            .request("eth_sendTransaction", json!([self.transaction(data, true)]))
            .await?;
        let hash = hash
            .as_str()
            .ok_or_else(|| {
                VerifierError::EndpointUnavailable(format!("Invalid transaction hash: {}", hash))
            })?
            .to_string();

        tracing::info!("Submitted verify transaction {}", hash);

        let deadline = Instant::now() + self.config.timeout;
        loop {
            let receipt = self
                .request("eth_getTransactionReceipt", json!([hash]))
                .await?;

            if !receipt.is_null() {
                let gas_used = parse_quantity(&receipt["gasUsed"]).ok();
                if receipt["status"].as_str() == Some("0x0") {
                    tracing::warn!("Verify transaction {} reverted, gas_used={:?}", hash, gas_used);
                    return Err(VerifierError::reverted(None));
                }
                tracing::info!("Verify transaction {} mined, gas_used={:?}", hash, gas_used);
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(VerifierError::EndpointUnavailable(format!(
                    "Timed out waiting for receipt of {}",
                    hash
                )));
            }
            tokio::time::sleep(self.config.receipt_poll_interval).await;
        }
    }
}

impl VerifyEndpoint for RpcEndpoint {
    async fn execute(&self, args: &[EncodedWords]) -> Result<bool> {
        let data = Self::calldata(args)?;

        let output = self
            .request("eth_call", json!([self.transaction(&data, false), "latest"]))
            .await?;
        let output = parse_bytes(&output)?;

        // No code at the address, or a revert the node did not report as an error.
        if output.is_empty() {
            return Err(VerifierError::reverted(None));
        }

        // A node that answered but whose contract does not speak this ABI.
        let accepted = verifyCall::abi_decode_returns(&output, true)
            .map_err(|e| {
                VerifierError::InvalidConfig(format!(
                    "{} did not return a verify result: {}",
                    self.config.verifier, e
                ))
            })?
            ._0;

        if self.config.sender.is_some() {
            self.commit(&data).await?;
        }

        Ok(accepted)
    }

    async fn estimate(&self, args: &[EncodedWords]) -> Result<u64> {
        let data = Self::calldata(args)?;
        let gas = self
            .request("eth_estimateGas", json!([self.transaction(&data, false)]))
            .await?;
        parse_quantity(&gas)
    }

    fn describe(&self) -> String {
        format!("{} via {}", self.config.verifier, self.config.url)
    }
}

fn classify_rpc_error(method: &str, error: RpcError) -> VerifierError {
    let message = error.message.to_ascii_lowercase();
    if error.code != REVERT_ERROR_CODE && !message.contains("revert") {
        return VerifierError::EndpointUnavailable(format!(
            "{} failed with RPC error {}: {}",
            method, error.code, error.message
        ));
    }

    let from_data = error
        .data
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|data| hex::decode(data.trim_start_matches("0x")).ok())
        .and_then(|data| Revert::abi_decode(&data, true).ok())
        .map(|revert| revert.reason);

    let reason = from_data.or_else(|| {
        error
            .message
            .split_once(": ")
            .map(|(_, reason)| reason.to_string())
    });

    VerifierError::reverted(reason)
}

fn parse_quantity(value: &Value) -> Result<u64> {
    value
        .as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
        .ok_or_else(|| VerifierError::EndpointUnavailable(format!("Invalid quantity: {}", value)))
}

fn parse_bytes(value: &Value) -> Result<Vec<u8>> {
    value
        .as_str()
        .and_then(|s| hex::decode(s.trim_start_matches("0x")).ok())
        .ok_or_else(|| VerifierError::EndpointUnavailable(format!("Invalid hex data: {}", value)))
}
