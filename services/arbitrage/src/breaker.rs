//! Three-state circuit breaker over submission outcomes.
//!
//! Closed → Open on N consecutive failures or cumulative loss ≥ L.
//! Open → HalfOpen once the cooldown elapses; HalfOpen admits exactly one
//! probe; its success closes the breaker and zeroes the counters, its
//! failure re-opens with a fresh cooldown. While open the orchestrator keeps
//! scanning and observing; it just submits nothing.

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    max_consecutive_failures: u32,
    max_cumulative_loss: i64,
    cooldown_ms: u64,

    state: BreakerState,
    consecutive_failures: u32,
    cumulative_loss: i64,
    tripped_until_ms: Option<u64>,
    total_trades: u64,
}

impl CircuitBreaker {
    pub fn new(max_consecutive_failures: u32, max_cumulative_loss: i64, cooldown_ms: u64) -> Self {
        Self {
            max_consecutive_failures,
            max_cumulative_loss: max_cumulative_loss.abs(),
            cooldown_ms,
            state: BreakerState::Closed,
            consecutive_failures: 0,
            cumulative_loss: 0,
            tripped_until_ms: None,
            total_trades: 0,
        }
    }

    /// Current state, advancing Open → HalfOpen when the cooldown has
    /// elapsed.
    pub fn state(&mut self, now_ms: u64) -> BreakerState {
        if self.state == BreakerState::Open {
            if let Some(until) = self.tripped_until_ms {
                if now_ms >= until {
                    info!("breaker cooldown elapsed - half-open, admitting one probe");
                    self.state = BreakerState::HalfOpen;
                }
            }
        }
        self.state
    }

    /// Whether a submission may go out right now.
    pub fn allows_submission(&mut self, now_ms: u64) -> bool {
        match self.state(now_ms) {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open => {
                warn!(
                    remaining_ms = self
                        .tripped_until_ms
                        .map(|t| t.saturating_sub(now_ms))
                        .unwrap_or(0),
                    "breaker open - submission suppressed"
                );
                false
            }
        }
    }

    /// A profitable (or at least successful) execution. Closes the breaker
    /// from half-open and zeroes both counters.
    pub fn record_success(&mut self, net_profit: i64) {
        self.total_trades += 1;
        if self.state == BreakerState::HalfOpen {
            info!("half-open probe succeeded - breaker closed");
        }
        self.state = BreakerState::Closed;
        self.consecutive_failures = 0;
        self.cumulative_loss = 0;
        self.tripped_until_ms = None;
        info!(
            net_profit,
            total_trades = self.total_trades,
            "breaker: success recorded"
        );
    }

    /// A failed or losing execution; `loss` is the MIST lost (gas, and any
    /// realized slippage). Returns true when this failure tripped the
    /// breaker.
    pub fn record_failure(&mut self, loss: i64, now_ms: u64) -> bool {
        self.total_trades += 1;
        self.consecutive_failures += 1;
        self.cumulative_loss += loss.abs();

        warn!(
            consecutive = self.consecutive_failures,
            cumulative_loss = self.cumulative_loss,
            "breaker: failure recorded"
        );

        if self.state == BreakerState::HalfOpen {
            self.trip(now_ms, "half-open probe failed");
            return true;
        }
        if self.consecutive_failures >= self.max_consecutive_failures {
            self.trip(now_ms, "consecutive-failure threshold");
            return true;
        }
        if self.cumulative_loss >= self.max_cumulative_loss {
            self.trip(now_ms, "cumulative-loss threshold");
            return true;
        }
        false
    }

    fn trip(&mut self, now_ms: u64, reason: &str) {
        error!(
            reason,
            cooldown_ms = self.cooldown_ms,
            "breaker tripped - trading suspended"
        );
        self.state = BreakerState::Open;
        self.tripped_until_ms = Some(now_ms + self.cooldown_ms);
    }
}
