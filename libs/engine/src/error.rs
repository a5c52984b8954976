//! Abort taxonomy of the composition engine.
//!
//! The three engine-owned codes mirror the published package's abort codes;
//! `E_ZERO_AMOUNT` and `E_NOT_PROFITABLE` share the value 1 because they live
//! in different modules on-chain (strategy modules vs the profit module).
//! Venue failures propagate unchanged.

use thiserror::Error;

pub const E_ZERO_AMOUNT: u64 = 1;
pub const E_NOT_PROFITABLE: u64 = 1;
pub const E_PAUSED: u64 = 2;

/// Failure raised by a venue contract during a composition leg.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VenueError {
    #[error("insufficient liquidity for swap")]
    InsufficientLiquidity,
    #[error("flash repayment short: provided {provided}, required {required}")]
    RepaymentShort { provided: u64, required: u64 },
    #[error("venue abort code {0}")]
    Abort(u64),
}

/// Everything a strategy entry can abort with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("swap amount must be positive")]
    ZeroAmount,
    #[error("output did not cover principal plus minimum profit")]
    NotProfitable,
    #[error("engine is paused")]
    Paused,
    #[error("balance split exceeds available value")]
    BalanceUnderflow,
    #[error("balance join overflows u64")]
    BalanceOverflow,
    #[error("destroyed a non-zero coin")]
    NonZeroDestroy,
    #[error(transparent)]
    Venue(#[from] VenueError),
}

impl EngineError {
    /// Abort code for the engine-owned failure modes; venue aborts carry
    /// their own codes and framework failures none.
    pub fn abort_code(&self) -> Option<u64> {
        match self {
            EngineError::ZeroAmount => Some(E_ZERO_AMOUNT),
            EngineError::NotProfitable => Some(E_NOT_PROFITABLE),
            EngineError::Paused => Some(E_PAUSED),
            EngineError::Venue(VenueError::Abort(code)) => Some(*code),
            _ => None,
        }
    }
}
