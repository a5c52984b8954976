//! # Kestrel Engine - Atomic Flash Arbitrage Compositions
//!
//! ## Purpose
//!
//! The on-chain composition engine: 27 deterministic, capability-gated entry
//! routines that chain flash-borrow, one or more swaps, and repay across five
//! venue protocols, so that any unprofitable outcome aborts the whole
//! transaction. This crate mirrors the published package one-to-one (entry
//! names, argument order, abort codes, and event shape) over typed venue
//! interfaces; the venue contracts themselves are external and appear here
//! only as traits.
//!
//! ## Integration Points
//!
//! - **Entry surface**: [`two_hop`] (17 variants) and [`tri_hop`] (10
//!   variants), all with the
//!   `(capability, pause switch, …venue handles…, amount, min_profit, clock,
//!   ctx)` prefix shape
//! - **Authority**: [`AdminCap`] minted once by [`deploy`]; every entry
//!   requires it, and it alone toggles the [`PauseSwitch`]
//! - **Settlement discipline**: flash receipts are hot potatoes: scoped
//!   handles whose drop path panics unless settled by repayment or dissolved
//!   by the abort path, standing in for the chain's consume-before-commit
//!   rule
//! - **Events**: every successful composition emits
//!   `{strategy, amount_in, profit}` into the [`TxContext`]
//!
//! ## Architecture Role
//!
//! ```text
//! entry(cap, pause, pools…, amount, min_profit, clock, ctx)
//!     ↓ guard          zero amount / paused → abort, no effects
//!     ↓ borrow         flash primitive on the source venue → receipt
//!     ↓ route          one (two-hop) or two (tri-hop) further swap legs
//!     ↓ assert profit  output ≥ debt + min_profit, else whole-tx revert
//!     ↓ repay          split debt from proceeds, settle the receipt
//!     ↓ emit+transfer  event + remainder to the caller
//! ```
//!
//! No async, no I/O, no clocks read; the engine is a pure deterministic
//! library, which is what makes the off-chain dry-run trustworthy.

pub mod admin;
pub mod asset;
pub mod coin;
pub mod context;
pub mod error;
pub mod event;
pub mod profit;
pub mod tri_hop;
pub mod two_hop;
pub mod venues;

#[cfg(test)]
pub(crate) mod testkit;

pub use admin::{deploy, AdminCap, PauseSwitch};
pub use asset::{Asset, DEEP};
pub use coin::{Balance, Coin};
pub use context::{Clock, Credit, TxContext};
pub use error::{EngineError, VenueError, E_NOT_PROFITABLE, E_PAUSED, E_ZERO_AMOUNT};
pub use event::ArbExecuted;

/// Phase 1 of every composition: reject zero amounts, then the pause gate.
/// Runs before any asset moves.
pub(crate) fn entry_guard(amount: u64, pause: &PauseSwitch) -> Result<(), EngineError> {
    if amount == 0 {
        return Err(EngineError::ZeroAmount);
    }
    admin::assert_not_paused(pause)
}

/// Phase 6 of every composition: emit the execution event and transfer the
/// remainder (the profit) to the sender, destroying it only when zero.
pub(crate) fn conclude<T: Asset>(
    tag: &'static str,
    amount_in: u64,
    amount_out: u64,
    remainder: Balance<T>,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    ctx.emit(ArbExecuted::record(tag, amount_in, amount_out));
    venues::sweep(Coin::from_balance(remainder), ctx)
}
