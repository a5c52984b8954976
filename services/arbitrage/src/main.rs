//! Kestrel; atomic cross-venue arbitrage on Sui.
//!
//! Wires the collectors, the strategy loop, and the execution path together:
//! config in, supervised ingestion tasks out, one orchestrator ticking until
//! Ctrl-C propagates the stop signal through every task.

mod breaker;
mod builder;
mod detector;
mod dry_run;
mod gas;
mod merge;
mod optimizer;
mod orchestrator;
mod signer;
mod submitter;

use anyhow::{Context, Result};
use breaker::CircuitBreaker;
use builder::TxBuilder;
use detector::Scanner;
use dry_run::DryRunner;
use gas::GasGauge;
use kestrel_collector::{
    now_ms, pool_metas, supervise, EventStream, Heartbeats, PoolCache, RpcPoller, VenuePackage,
};
use kestrel_rpc::RpcClient;
use kestrel_types::Config;
use merge::CoinMerger;
use optimizer::Optimizer;
use orchestrator::{Orchestrator, MAX_POOL_STALENESS_MS};
use signer::Signer;
use std::sync::Arc;
use std::time::Duration;
use submitter::Submitter;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("kestrel starting");

    let config = Config::from_env().context("configuration")?;
    let report = config.validate();
    for warning in &report.warnings {
        warn!("{warning}");
    }
    for problem in &report.errors {
        error!("{problem}");
    }
    if report.is_fatal() {
        anyhow::bail!("startup validation failed with {} error(s)", report.errors.len());
    }

    let signer = Signer::from_hex(&config.private_key_hex).context("wallet key")?;
    let sender = signer.address();
    info!(address = %sender, rpc = %config.rpc_url, "wallet loaded");
    info!(
        pools = config.monitored_pools.len(),
        min_profit = config.min_profit,
        tick_ms = config.poll_interval_ms,
        dry_run = config.dry_run_before_submit,
        "configuration loaded"
    );

    // ── Shared state and stop signal ──
    let cache = PoolCache::new();
    let heartbeats = Heartbeats::new();
    let (stop_tx, stop_rx) = watch::channel(false);

    // ── Collectors under supervision ──
    let poller = RpcPoller::new(&config)?;
    poller.seed(&cache).await.context("seeding pool cache")?;
    info!(cached = cache.len(), "pool cache ready");

    let mut tasks = Vec::new();
    tasks.push(supervise(
        Arc::new(poller),
        cache.clone(),
        heartbeats.register("rpc-poller", now_ms()),
        stop_rx.clone(),
    ));

    if config.use_websocket {
        if config.ws_mode != "event" {
            warn!(mode = %config.ws_mode, "unsupported WS_MODE - falling back to event mode");
        }
        let stream = EventStream::new(
            &config.effective_ws_url(),
            &config.rpc_url,
            VenuePackage::from_env(&config.package_id),
            pool_metas(&config),
        )?;
        tasks.push(supervise(
            Arc::new(stream),
            cache.clone(),
            heartbeats.register("event-stream", now_ms()),
            stop_rx.clone(),
        ));
        info!("websocket event stream enabled (poller stays on as fallback)");
    }

    // ── Gas gauge poller ──
    let gauge = GasGauge::new(config.min_gas_balance);
    let gas_rpc = RpcClient::new(&config.rpc_url, Duration::from_secs(5))?;
    tasks.push(gas::spawn_gas_poller(
        gas_rpc,
        sender.clone(),
        gauge.clone(),
        stop_rx.clone(),
    ));

    // ── Strategy pipeline ──
    let exec_rpc = RpcClient::new(&config.rpc_url, Duration::from_secs(10))?;
    let orchestrator = Orchestrator::new(
        cache,
        heartbeats,
        Scanner::new(config.min_profit, MAX_POOL_STALENESS_MS),
        Optimizer::new(),
        TxBuilder::new(&config, exec_rpc.clone(), &sender),
        DryRunner::new(RpcClient::new(&config.rpc_url, Duration::from_secs(5))?),
        Submitter::new(RpcClient::new(&config.rpc_url, Duration::from_secs(30))?),
        signer,
        gauge,
        CircuitBreaker::new(
            config.cb_max_consecutive_failures,
            config.cb_max_cumulative_loss,
            config.cb_cooldown_ms,
        ),
        CoinMerger::new(exec_rpc, &sender),
        Duration::from_millis(config.poll_interval_ms),
        config.dry_run_before_submit,
    );

    let strategy = tokio::spawn(orchestrator.run(stop_rx));

    // ── Shutdown ──
    info!("running - Ctrl-C to stop");
    signal::ctrl_c().await.context("signal handler")?;
    info!("stop signal received - draining tasks");
    stop_tx.send(true).ok();

    if let Err(e) = strategy.await.context("strategy task")? {
        error!(error = %e, "strategy loop error at shutdown");
    }
    for task in tasks {
        task.await.ok();
    }

    info!("kestrel stopped");
    Ok(())
}
