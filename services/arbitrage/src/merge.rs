//! SUI coin-dust consolidation.
//!
//! Gas rebates and profit transfers fragment the wallet into many small
//! `Coin<SUI>` objects over time, which eventually collides with
//! per-transaction object limits. Every `CHECK_EVERY_CYCLES` orchestrator
//! ticks the merger counts the wallet's coins and, above the threshold,
//! hands back a `payAllSui` consolidation transaction for the normal
//! sign-and-submit path. Merge failures are logged and never reach the
//! circuit breaker.

use anyhow::{Context, Result};
use kestrel_rpc::RpcClient;
use serde_json::json;
use tracing::{debug, info};

const SUI_COIN_TYPE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";
/// Coin-object count above which consolidation kicks in.
const MERGE_THRESHOLD: usize = 20;
/// Orchestrator ticks between coin counts (~50 s at the default tick).
const CHECK_EVERY_CYCLES: u64 = 100;
const MERGE_GAS_BUDGET: u64 = 10_000_000;

pub struct CoinMerger {
    rpc: RpcClient,
    owner: String,
    cycles: u64,
}

impl CoinMerger {
    pub fn new(rpc: RpcClient, owner: &str) -> Self {
        Self {
            rpc,
            owner: owner.to_string(),
            cycles: 0,
        }
    }

    /// Call once per orchestrator tick. Returns base64 tx bytes when a
    /// consolidation is due; the caller signs and submits.
    pub async fn maybe_merge(&mut self) -> Result<Option<String>> {
        self.cycles += 1;
        if self.cycles % CHECK_EVERY_CYCLES != 0 {
            return Ok(None);
        }

        let coins = self.sui_coin_ids().await?;
        if coins.len() <= MERGE_THRESHOLD {
            debug!(coins = coins.len(), threshold = MERGE_THRESHOLD, "no merge needed");
            return Ok(None);
        }

        info!(coins = coins.len(), "consolidating fragmented gas coins");
        let result = self
            .rpc
            .call(
                "unsafe_payAllSui",
                json!([
                    self.owner,
                    coins,
                    self.owner, // consolidate back to ourselves
                    MERGE_GAS_BUDGET.to_string(),
                ]),
            )
            .await?;

        result
            .get("txBytes")
            .and_then(|t| t.as_str())
            .map(|s| Some(s.to_string()))
            .context("payAllSui response missing txBytes")
    }

    async fn sui_coin_ids(&self) -> Result<Vec<String>> {
        let result = self
            .rpc
            .call(
                "suix_getCoins",
                json!([self.owner, SUI_COIN_TYPE, null, null]),
            )
            .await?;

        Ok(result
            .get("data")
            .and_then(|d| d.as_array())
            .map(|coins| {
                coins
                    .iter()
                    .filter_map(|c| c.get("coinObjectId").and_then(|id| id.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}
