//! Aftermath weighted-AMM adapter.
//!
//! No flash primitive; Aftermath is only ever the sell leg. The venue's own
//! slippage parameter is passed fully open (`u64::MAX`) because the profit
//! assertion is the correctness guard; a minimum output of 1 defends against
//! the degenerate zero-output fill.

use crate::asset::Asset;
use crate::coin::{Balance, Coin};
use crate::error::{EngineError, VenueError};

/// Venue-side slippage tolerance, disabled.
const SLIPPAGE_DISABLED: u64 = u64::MAX;
/// Floor that rejects a zero-output fill.
const MIN_OUT: u64 = 1;

/// External interface of an Aftermath weighted `Pool<A, B>`.
pub trait AftermathPool<A: Asset, B: Asset> {
    fn swap_exact_in_a2b(
        &mut self,
        input: Coin<A>,
        slippage: u64,
        min_out: u64,
    ) -> Result<Coin<B>, VenueError>;
    fn swap_exact_in_b2a(
        &mut self,
        input: Coin<B>,
        slippage: u64,
        min_out: u64,
    ) -> Result<Coin<A>, VenueError>;
}

pub fn swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl AftermathPool<A, B>,
    input: Balance<A>,
) -> Result<Balance<B>, EngineError> {
    let out = pool.swap_exact_in_a2b(Coin::from_balance(input), SLIPPAGE_DISABLED, MIN_OUT)?;
    Ok(out.into_balance())
}

pub fn swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl AftermathPool<A, B>,
    input: Balance<B>,
) -> Result<Balance<A>, EngineError> {
    let out = pool.swap_exact_in_b2a(Coin::from_balance(input), SLIPPAGE_DISABLED, MIN_OUT)?;
    Ok(out.into_balance())
}
