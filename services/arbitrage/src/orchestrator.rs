//! The strategy loop.
//!
//! One tick: read the cache → scan pairs and cycles → size the best
//! candidate → build → dry-run → rebuild with the tightened floor → sign →
//! submit → feed the breaker and the gas gauge. Every stage can veto and
//! drop the candidate; the phases are strictly serial and at most one
//! transaction is in flight per tick. The breaker and the gas floor gate
//! submission only; scanning continues so the operator can see what the
//! bot would be doing.

use crate::breaker::CircuitBreaker;
use crate::builder::TxBuilder;
use crate::detector::Scanner;
use crate::dry_run::DryRunner;
use crate::gas::GasGauge;
use crate::merge::CoinMerger;
use crate::optimizer::Optimizer;
use crate::signer::Signer;
use crate::submitter::{SubmitResult, Submitter};
use anyhow::Result;
use kestrel_collector::{now_ms, Heartbeats, PoolCache};
use kestrel_types::{BotError, Opportunity};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Snapshots older than this are invisible to scanning, and a tick where
/// every snapshot is older is skipped outright.
pub const MAX_POOL_STALENESS_MS: u64 = 10_000;
/// Candidates older than this (prices have moved) are dropped unexecuted.
const MAX_CANDIDATE_AGE_MS: u64 = 3_000;

pub struct Orchestrator {
    pub cache: PoolCache,
    pub heartbeats: Heartbeats,
    pub scanner: Scanner,
    pub optimizer: Optimizer,
    pub builder: TxBuilder,
    pub dry_runner: DryRunner,
    pub submitter: Submitter,
    pub signer: Signer,
    pub gas: GasGauge,
    pub breaker: CircuitBreaker,
    pub merger: CoinMerger,
    pub tick_interval: Duration,
    pub dry_run_enabled: bool,

    total_trades: u64,
    total_profit: i64,
    total_gas: u64,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cache: PoolCache,
        heartbeats: Heartbeats,
        scanner: Scanner,
        optimizer: Optimizer,
        builder: TxBuilder,
        dry_runner: DryRunner,
        submitter: Submitter,
        signer: Signer,
        gas: GasGauge,
        breaker: CircuitBreaker,
        merger: CoinMerger,
        tick_interval: Duration,
        dry_run_enabled: bool,
    ) -> Self {
        Self {
            cache,
            heartbeats,
            scanner,
            optimizer,
            builder,
            dry_runner,
            submitter,
            signer,
            gas,
            breaker,
            merger,
            tick_interval,
            dry_run_enabled,
            total_trades: 0,
            total_profit: 0,
            total_gas: 0,
        }
    }

    /// Tick until the stop signal. An in-flight tick always completes before
    /// shutdown is observed, so submissions are never abandoned midway.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<()> {
        info!(tick_ms = self.tick_interval.as_millis() as u64, "strategy loop started");
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.tick_once().await;
                }
            }
        }

        info!(
            total_trades = self.total_trades,
            total_profit = self.total_profit,
            total_gas = self.total_gas,
            "strategy loop stopped"
        );
        Ok(())
    }

    async fn tick_once(&mut self) {
        let now = now_ms();

        // Liveness: with every collector dead the cache is a museum.
        if self.heartbeats.all_dead(now, MAX_POOL_STALENESS_MS) {
            warn!("all collectors dead - scanning suspended");
            return;
        }

        let pools = self.cache.snapshot();
        if pools.is_empty() {
            return;
        }
        let fresh = pools
            .iter()
            .filter(|p| p.staleness_ms(now) <= MAX_POOL_STALENESS_MS)
            .count();
        if fresh == 0 {
            warn!("all pool data stale - skipping tick");
            return;
        }

        let can_submit = self.breaker.allows_submission(now) && self.gas.sufficient();

        // Housekeeping rides the same submission gate as trades.
        if can_submit {
            self.run_coin_merge().await;
        }

        // Scan both shapes and take the best candidate overall.
        let mut candidates = self.scanner.scan_two_hop(&pools, now);
        candidates.extend(self.scanner.scan_tri_hop(&pools, now));
        candidates.sort_by(|a, b| b.expected_profit.cmp(&a.expected_profit));

        let Some(mut best) = candidates.into_iter().next() else {
            return;
        };

        if !self.optimizer.refine(&mut best, &pools) {
            debug!(tag = ?best.tag, "optimizer veto");
            return;
        }
        if best.age_ms(now_ms()) > MAX_CANDIDATE_AGE_MS {
            debug!(age_ms = best.age_ms(now_ms()), "candidate expired before build");
            return;
        }
        if !best.is_profitable() {
            debug!(net = best.net_profit, "net profit veto");
            return;
        }

        if !can_submit {
            info!(
                tag = ?best.tag,
                net_profit = best.net_profit,
                "opportunity observed while submission suspended"
            );
            return;
        }

        info!(
            tag = ?best.tag,
            amount = best.amount_in,
            expected_profit = best.expected_profit,
            net_profit = best.net_profit,
            "executing candidate"
        );
        self.execute(best).await;
    }

    async fn execute(&mut self, mut opp: Opportunity) {
        let tx_bytes = match self.builder.build(&opp).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "build failed");
                return;
            }
        };

        let final_bytes = if self.dry_run_enabled {
            match self.dry_runner.validate(&mut opp, &tx_bytes).await {
                Ok(true) => {
                    debug!(gas = opp.estimated_gas, net = opp.net_profit, "dry-run passed");
                }
                Ok(false) => {
                    // A veto, not a failure: the breaker only counts spent gas.
                    warn!(tag = ?opp.tag, "dry-run veto");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "dry-run transport failure");
                    return;
                }
            }
            // Rebuild with the floor tightened around the simulated profit.
            match self.builder.build(&opp).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "rebuild failed");
                    return;
                }
            }
        } else {
            tx_bytes
        };

        let signature = match self.signer.sign_transaction(&final_bytes) {
            Ok(sig) => sig,
            Err(e) => {
                warn!(error = %e, "signing failed");
                return;
            }
        };

        match self.submitter.submit(&final_bytes, &signature).await {
            Ok(result) => self.settle(result),
            Err(e) => {
                // A transport failure that never reached the chain is not a
                // trading loss; only non-transient submit failures feed the
                // breaker.
                let failure = BotError::Submit(e.to_string());
                if failure.is_transient() {
                    warn!(error = %failure, "submission transport failure - not counted");
                } else {
                    warn!(error = %failure, "submission failed");
                    self.breaker.record_failure(0, now_ms());
                }
            }
        }
    }

    /// Feed an execution outcome into the books, the gauge, and the breaker.
    fn settle(&mut self, result: SubmitResult) {
        if result.duplicate {
            return;
        }
        self.total_trades += 1;
        self.total_gas += result.gas_cost;
        self.gas.deduct(result.gas_cost);

        if result.success {
            let net = result.profit.unwrap_or(0) as i64 - result.gas_cost as i64;
            self.total_profit += net;
            self.breaker.record_success(net);
            info!(
                digest = %result.digest,
                profit = result.profit.unwrap_or(0),
                gas = result.gas_cost,
                total_trades = self.total_trades,
                total_profit = self.total_profit,
                "arbitrage executed"
            );
        } else {
            self.total_profit -= result.gas_cost as i64;
            self.breaker
                .record_failure(-(result.gas_cost as i64), now_ms());
            warn!(
                digest = %result.digest,
                error = ?result.error_message,
                "execution failed on-chain - gas lost"
            );
        }
    }

    async fn run_coin_merge(&mut self) {
        let merge_tx = match self.merger.maybe_merge().await {
            Ok(Some(tx)) => tx,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "coin merge check failed");
                return;
            }
        };

        let Ok(signature) = self.signer.sign_transaction(&merge_tx) else {
            warn!("failed to sign merge transaction");
            return;
        };
        match self.submitter.submit(&merge_tx, &signature).await {
            Ok(result) if result.success => {
                self.gas.deduct(result.gas_cost);
                info!(digest = %result.digest, gas = result.gas_cost, "gas coins consolidated");
            }
            Ok(result) => warn!(error = ?result.error_message, "coin merge failed on-chain"),
            Err(e) => warn!(error = %e, "coin merge submission failed"),
        }
    }
}
