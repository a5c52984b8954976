//! Bot-side failure taxonomy.
//!
//! Classifies every off-chain failure mode so callers can decide between
//! retry, drop, and breaker feedback without string-matching messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("WebSocket error: {0}")]
    WebSocket(String),
    #[error("parse error for pool {pool_id}: {reason}")]
    Parse { pool_id: String, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transaction build error: {0}")]
    Build(String),
    #[error("dry-run rejected: {0}")]
    DryRun(String),
    #[error("submission error: {0}")]
    Submit(String),
    #[error("insufficient gas balance: {balance} < {required} MIST")]
    InsufficientGas { balance: u64, required: u64 },
    #[error("pool data stale by {age_ms}ms")]
    StaleData { age_ms: u64 },
    #[error("circuit breaker open")]
    BreakerOpen,
}

impl BotError {
    /// Transient failures worth retrying with backoff; everything else is
    /// dropped or fed to the circuit breaker.
    pub fn is_transient(&self) -> bool {
        match self {
            BotError::Rpc(msg) | BotError::Submit(msg) => {
                let m = msg.to_ascii_lowercase();
                m.contains("timeout")
                    || m.contains("timed out")
                    || m.contains("429")
                    || m.contains("rate limit")
                    || m.contains("connection")
            }
            BotError::WebSocket(_) | BotError::StaleData { .. } => true,
            _ => false,
        }
    }

    /// Failures that should count against the circuit breaker. Dry-run
    /// rejections and stale data are vetoes, not losses.
    pub fn counts_as_breaker_failure(&self) -> bool {
        matches!(self, BotError::Submit(_))
    }
}
