//! # Kestrel RPC - Sui JSON-RPC Plumbing
//!
//! ## Purpose
//!
//! One small client over the node's JSON-RPC surface so the poller, dry-run
//! validator, submitter, and gas gauge share the request/response envelope
//! handling instead of each re-implementing it. Also home to the gas-summary
//! arithmetic both the dry-run and submission paths read back from effects.
//!
//! Every call suspends on the HTTP round-trip and is therefore cancellable at
//! shutdown. Errors carry the RPC method for context; callers decide whether
//! a failure is transient.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

/// Shared JSON-RPC client with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Build a client for `url` with the given request timeout.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_nodelay(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and return the `result` payload.
    ///
    /// A JSON-RPC `error` member is surfaced as an `Err` with the method name
    /// attached; transport and decode failures likewise.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await
            .with_context(|| format!("{method}: request failed"))?;

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("{method}: invalid JSON response"))?;

        if let Some(error) = body.get("error") {
            anyhow::bail!("{method}: RPC error: {error}");
        }

        body.get("result")
            .cloned()
            .with_context(|| format!("{method}: response missing result"))
    }
}

/// Net gas from a transaction-effects `gasUsed` summary:
/// computation + storage − rebate, saturating at zero.
///
/// The node encodes the three components as decimal strings.
pub fn net_gas_from_effects(effects: &Value) -> u64 {
    let Some(gas) = effects.get("gasUsed") else {
        return 0;
    };
    let computation = string_u64(gas, "computationCost");
    let storage = string_u64(gas, "storageCost");
    let rebate = string_u64(gas, "storageRebate");
    let gross = computation + storage;
    gross - rebate.min(gross)
}

/// Execution status string from a transaction-effects payload.
pub fn effects_status(effects: &Value) -> &str {
    effects
        .get("status")
        .and_then(|s| s.get("status"))
        .and_then(|s| s.as_str())
        .unwrap_or("unknown")
}

/// Failure description from a transaction-effects payload, if any.
pub fn effects_error(effects: &Value) -> Option<String> {
    effects
        .get("status")
        .and_then(|s| s.get("error"))
        .and_then(|e| e.as_str())
        .map(str::to_string)
}

fn string_u64(value: &Value, field: &str) -> u64 {
    value
        .get(field)
        .and_then(|v| v.as_str().map(str::to_string).or_else(|| v.as_u64().map(|n| n.to_string())))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
