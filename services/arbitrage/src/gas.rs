//! Wallet gas gauge.
//!
//! A dedicated task polls the wallet's SUI balance every 10 s into an
//! atomic; the orchestrator reads it synchronously at each tick and
//! deducts known expenditures optimistically between polls so a burst of
//! submissions cannot overdraw on stale data. RPC failures leave the last
//! reading in place; a transient balance outage must not halt trading on
//! its own.

use anyhow::{Context, Result};
use kestrel_rpc::RpcClient;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SUI_COIN_TYPE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";
const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shared balance gauge. Until the first successful poll the balance reads
/// as unknown and trading is allowed; better one optimistic trade than a
/// bot that never starts because the balance endpoint hiccuped.
#[derive(Debug, Clone)]
pub struct GasGauge {
    balance: Arc<AtomicU64>,
    min_balance: u64,
}

impl GasGauge {
    const UNKNOWN: u64 = u64::MAX;

    pub fn new(min_balance: u64) -> Self {
        Self {
            balance: Arc::new(AtomicU64::new(Self::UNKNOWN)),
            min_balance,
        }
    }

    pub fn record(&self, balance: u64) {
        self.balance.store(balance, Ordering::Relaxed);
    }

    /// Optimistically account for gas just spent.
    pub fn deduct(&self, gas: u64) {
        let current = self.balance.load(Ordering::Relaxed);
        if current != Self::UNKNOWN {
            self.balance
                .store(current.saturating_sub(gas), Ordering::Relaxed);
        }
    }

    pub fn balance(&self) -> Option<u64> {
        match self.balance.load(Ordering::Relaxed) {
            Self::UNKNOWN => None,
            value => Some(value),
        }
    }

    /// Whether submissions may proceed.
    pub fn sufficient(&self) -> bool {
        match self.balance() {
            None => true,
            Some(balance) => balance >= self.min_balance,
        }
    }
}

/// Spawn the balance poller. Completes when the stop signal fires.
pub fn spawn_gas_poller(
    rpc: RpcClient,
    owner: String,
    gauge: GasGauge,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        info!(min_balance = gauge.min_balance, "gas poller started");

        loop {
            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!("gas poller stopped");
                        return;
                    }
                }
                _ = ticker.tick() => {
                    match fetch_balance(&rpc, &owner).await {
                        Ok(balance) => {
                            gauge.record(balance);
                            debug!(balance, "wallet balance");
                            if balance < gauge.min_balance {
                                warn!(
                                    balance,
                                    min = gauge.min_balance,
                                    "gas balance below floor - submission suspended"
                                );
                            }
                        }
                        Err(e) => warn!(error = %e, "balance poll failed - keeping last reading"),
                    }
                }
            }
        }
    })
}

async fn fetch_balance(rpc: &RpcClient, owner: &str) -> Result<u64> {
    let result = rpc
        .call("suix_getBalance", json!([owner, SUI_COIN_TYPE]))
        .await?;
    result
        .get("totalBalance")
        .and_then(|b| b.as_str())
        .and_then(|s| s.parse().ok())
        .context("balance response missing totalBalance")
}
