//! Collector supervision: restart-with-backoff and liveness heartbeats.
//!
//! Every collector publishes a heartbeat the orchestrator can read; the
//! supervisor restarts a failed task with jittered exponential backoff and
//! resets the backoff once a run has proven itself stable. The stop signal
//! interrupts both the run and the backoff sleep.

use crate::cache::PoolCache;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A run long enough to count as healthy resets the backoff.
const STABLE_RUN: Duration = Duration::from_secs(60);

/// Liveness beacon one collector task publishes.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    last_beat_ms: Arc<AtomicU64>,
}

impl Heartbeat {
    fn new(now_ms: u64) -> Self {
        Self {
            last_beat_ms: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    pub fn beat(&self, now_ms: u64) {
        self.last_beat_ms.store(now_ms, Ordering::Relaxed);
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_beat_ms.load(Ordering::Relaxed))
    }
}

/// Registry of collector heartbeats, read by the orchestrator's liveness
/// guard.
#[derive(Debug, Clone, Default)]
pub struct Heartbeats {
    beats: Arc<DashMap<String, Heartbeat>>,
}

impl Heartbeats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, now_ms: u64) -> Heartbeat {
        let beat = Heartbeat::new(now_ms);
        self.beats.insert(name.to_string(), beat.clone());
        beat
    }

    /// A collector is dead when its heartbeat has not advanced in `ttl_ms`.
    /// Scanning is only suspended when every collector is dead.
    pub fn all_dead(&self, now_ms: u64, ttl_ms: u64) -> bool {
        !self.beats.is_empty()
            && self
                .beats
                .iter()
                .all(|entry| entry.value().age_ms(now_ms) > ttl_ms)
    }

    pub fn dead_tasks(&self, now_ms: u64, ttl_ms: u64) -> Vec<String> {
        self.beats
            .iter()
            .filter(|entry| entry.value().age_ms(now_ms) > ttl_ms)
            .map(|entry| entry.key().clone())
            .collect()
    }
}

/// Bounded exponential backoff with jitter.
#[derive(Debug)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
    attempt: u32,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self {
            base,
            cap,
            attempt: 0,
        }
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Next delay: base · 2^attempt, capped, with ±20% jitter so restarting
    /// collectors do not stampede the node in lockstep.
    pub fn next_delay(&mut self) -> Duration {
        let exp = self.base.saturating_mul(1u32 << self.attempt.min(16));
        let capped = exp.min(self.cap);
        self.attempt = self.attempt.saturating_add(1);

        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        capped.mul_f64(jitter)
    }
}

/// One supervised ingestion task (a poller or an event stream).
#[async_trait]
pub trait CollectorTask: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Run until failure or stop. Implementations must `beat` the heartbeat
    /// on every successful cache write.
    async fn run(&self, cache: PoolCache, heartbeat: Heartbeat) -> Result<()>;
}

/// Spawn `task` under supervision. The returned handle completes only after
/// the stop signal is observed.
pub fn supervise(
    task: Arc<dyn CollectorTask>,
    cache: PoolCache,
    heartbeat: Heartbeat,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(30));

        loop {
            if *stop.borrow() {
                info!(task = task.name(), "collector stopped");
                return;
            }

            let started = Instant::now();
            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!(task = task.name(), "collector stopping mid-run");
                        return;
                    }
                }
                outcome = task.run(cache.clone(), heartbeat.clone()) => {
                    match outcome {
                        Ok(()) => warn!(task = task.name(), "collector ended cleanly - restarting"),
                        Err(e) => error!(task = task.name(), error = %e, "collector failed - restarting"),
                    }
                }
            }

            if started.elapsed() >= STABLE_RUN {
                backoff.reset();
            }
            let delay = backoff.next_delay();
            warn!(task = task.name(), delay_ms = delay.as_millis() as u64, "collector backoff");

            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!(task = task.name(), "collector stopped during backoff");
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    })
}
