//! Signed-transaction submission and result parsing.
//!
//! Retries are transport-level only: once a transaction has reached the
//! chain it is never re-sent, and the node telling us a digest was "already
//! executed" is treated as success with no new effect; the first submission
//! landed and a replay would change nothing.

use anyhow::Result;
use kestrel_rpc::{effects_error, effects_status, net_gas_from_effects, RpcClient};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

use crate::dry_run::profit_from_events;

/// Transport retries before giving up on a submission.
const MAX_TRANSPORT_RETRIES: u32 = 2;

pub struct Submitter {
    rpc: RpcClient,
}

#[derive(Debug)]
pub struct SubmitResult {
    pub digest: String,
    pub success: bool,
    /// Net gas charged, MIST.
    pub gas_cost: u64,
    /// Realized profit from the execution event, when one was emitted.
    pub profit: Option<u64>,
    /// The node reported the digest as already executed; success with no
    /// new effect.
    pub duplicate: bool,
    pub error_message: Option<String>,
}

impl Submitter {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Submit and wait for local execution.
    pub async fn submit(&self, tx_bytes: &str, signature: &str) -> Result<SubmitResult> {
        let mut last_error = None;

        for attempt in 0..=MAX_TRANSPORT_RETRIES {
            if attempt > 0 {
                warn!(attempt, "retrying submission transport");
                tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
            }

            match self.submit_once(tx_bytes, signature).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let message = e.to_string();
                    if is_already_executed(&message) {
                        info!("digest already executed - idempotent success");
                        return Ok(SubmitResult {
                            digest: "already-executed".to_string(),
                            success: true,
                            gas_cost: 0,
                            profit: None,
                            duplicate: true,
                            error_message: None,
                        });
                    }
                    warn!(attempt, error = %message, "submission attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.expect("at least one attempt ran"))
    }

    async fn submit_once(&self, tx_bytes: &str, signature: &str) -> Result<SubmitResult> {
        let result = self
            .rpc
            .call(
                "sui_executeTransactionBlock",
                json!([
                    tx_bytes,
                    [signature],
                    {"showEffects": true, "showEvents": true},
                    "WaitForLocalExecution",
                ]),
            )
            .await?;

        Ok(parse_execution(&result))
    }
}

/// Fold an execution response into a [`SubmitResult`].
fn parse_execution(result: &Value) -> SubmitResult {
    let digest = result
        .get("digest")
        .and_then(|d| d.as_str())
        .unwrap_or("unknown")
        .to_string();

    let effects = result.get("effects").cloned().unwrap_or(Value::Null);
    let status = effects_status(&effects);
    let gas_cost = net_gas_from_effects(&effects);
    let success = status == "success";
    let profit = profit_from_events(result.get("events"));

    if success {
        info!(digest = %digest, gas_cost, profit = ?profit, "executed on-chain");
    } else {
        warn!(digest = %digest, error = ?effects_error(&effects), "failed on-chain");
    }

    SubmitResult {
        digest,
        success,
        gas_cost,
        profit,
        duplicate: false,
        error_message: if success { None } else { effects_error(&effects) },
    }
}

/// The node's phrasing varies across versions; any of these means the
/// transaction already landed.
fn is_already_executed(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("already executed")
        || lowered.contains("transaction already finalized")
        || lowered.contains("duplicate transaction")
}
