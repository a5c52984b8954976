//! Dry-run validation against the node's simulation endpoint.
//!
//! Local simulation prices a candidate off cached snapshots; the dry-run
//! executes the real entry against live chain state and is the last veto
//! before gas is spent. It also returns the two numbers worth trusting more
//! than our own model: the actual gas charge and the actual profit the
//! profit event reports, which the orchestrator folds back into the
//! candidate before rebuilding with a tightened floor.

use anyhow::Result;
use kestrel_rpc::{effects_error, effects_status, net_gas_from_effects, RpcClient};
use kestrel_types::Opportunity;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub struct DryRunner {
    rpc: RpcClient,
}

pub struct DryRunOutcome {
    pub success: bool,
    pub gas_cost: u64,
    pub simulated_profit: Option<u64>,
    pub error: Option<String>,
}

impl DryRunner {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Simulate `tx_bytes`. A simulation failure is a veto, not an error;
    /// only transport problems surface as `Err`.
    pub async fn dry_run(&self, tx_bytes: &str) -> Result<DryRunOutcome> {
        let result = self
            .rpc
            .call("sui_dryRunTransactionBlock", json!([tx_bytes]))
            .await?;

        let effects = result.get("effects").cloned().unwrap_or(Value::Null);
        let status = effects_status(&effects);
        let gas_cost = net_gas_from_effects(&effects);

        if status != "success" {
            let error = effects_error(&effects);
            warn!(error = ?error, "dry-run rejected");
            return Ok(DryRunOutcome {
                success: false,
                gas_cost,
                simulated_profit: None,
                error,
            });
        }

        let simulated_profit = profit_from_events(result.get("events"));
        debug!(gas_cost, profit = ?simulated_profit, "dry-run passed");
        Ok(DryRunOutcome {
            success: true,
            gas_cost,
            simulated_profit,
            error: None,
        })
    }

    /// Dry-run a candidate and fold the simulated actuals back into it.
    /// Returns whether the candidate is still worth submitting.
    pub async fn validate(&self, opp: &mut Opportunity, tx_bytes: &str) -> Result<bool> {
        let outcome = self.dry_run(tx_bytes).await?;

        opp.estimated_gas = outcome.gas_cost;
        if !outcome.success {
            opp.refresh_net();
            return Ok(false);
        }
        if let Some(profit) = outcome.simulated_profit {
            opp.expected_profit = profit;
        }
        opp.refresh_net();
        Ok(opp.is_profitable())
    }
}

/// Realized profit from an `ArbExecuted` event list, if one is present.
pub(crate) fn profit_from_events(events: Option<&Value>) -> Option<u64> {
    events?
        .as_array()?
        .iter()
        .find_map(|event| {
            let event_type = event.get("type")?.as_str()?;
            if !event_type.contains("ArbExecuted") {
                return None;
            }
            let profit = event.get("parsedJson")?.get("profit")?;
            profit
                .as_u64()
                .or_else(|| profit.as_str().and_then(|s| s.parse().ok()))
        })
}
