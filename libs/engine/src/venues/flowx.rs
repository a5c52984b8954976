//! FlowX CLMM adapter.
//!
//! Balance-based like Cetus, but the flash receipt is opaque; today the
//! venue charges no flash fee, so settlement repays the requested amount; a
//! future fee term would surface as a venue-side abort at settlement.

use super::{DebtGuard, Obligation, MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use crate::asset::Asset;
use crate::coin::Balance;
use crate::error::{EngineError, VenueError};
use std::marker::PhantomData;

/// External interface of a FlowX CLMM `Pool<A, B>`.
pub trait FlowxPool<A: Asset, B: Asset> {
    fn swap_a2b(&mut self, input: Balance<A>, sqrt_price_limit: u128)
        -> Result<Balance<B>, VenueError>;
    fn swap_b2a(&mut self, input: Balance<B>, sqrt_price_limit: u128)
        -> Result<Balance<A>, VenueError>;
    fn flash_swap_a2b(
        &mut self,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> Result<Balance<B>, VenueError>;
    fn flash_swap_b2a(
        &mut self,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> Result<Balance<A>, VenueError>;
    fn repay_flash_a(&mut self, repayment: Balance<A>) -> Result<(), VenueError>;
    fn repay_flash_b(&mut self, repayment: Balance<B>) -> Result<(), VenueError>;
}

/// Opaque flash receipt; repay exactly what was requested.
#[must_use = "a flash receipt must be settled before the transaction ends"]
#[derive(Debug)]
pub struct FlowxReceipt<Debt: Asset> {
    assumed_repayment: u64,
    guard: DebtGuard,
    _asset: PhantomData<Debt>,
}

impl<Debt: Asset> FlowxReceipt<Debt> {
    fn new(amount: u64) -> Self {
        Self {
            assumed_repayment: amount,
            guard: DebtGuard::armed(),
            _asset: PhantomData,
        }
    }

    pub fn assumed_repayment(&self) -> u64 {
        self.assumed_repayment
    }

    fn settle(mut self) -> u64 {
        self.guard.defuse();
        self.assumed_repayment
    }
}

impl<Debt: Asset> Obligation for FlowxReceipt<Debt> {
    fn dissolve(mut self) {
        self.guard.defuse();
    }
}

pub fn flash_swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl FlowxPool<A, B>,
    amount: u64,
) -> Result<(Balance<B>, FlowxReceipt<A>), EngineError> {
    let out = pool.flash_swap_a2b(amount, MIN_SQRT_PRICE)?;
    Ok((out, FlowxReceipt::new(amount)))
}

pub fn flash_swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl FlowxPool<A, B>,
    amount: u64,
) -> Result<(Balance<A>, FlowxReceipt<B>), EngineError> {
    let out = pool.flash_swap_b2a(amount, MAX_SQRT_PRICE)?;
    Ok((out, FlowxReceipt::new(amount)))
}

pub fn repay_flash_a<A: Asset, B: Asset>(
    pool: &mut impl FlowxPool<A, B>,
    proceeds: &mut Balance<A>,
    receipt: FlowxReceipt<A>,
) -> Result<(), EngineError> {
    let owed = receipt.settle();
    let repayment = proceeds.split(owed)?;
    pool.repay_flash_a(repayment)?;
    Ok(())
}

pub fn repay_flash_b<A: Asset, B: Asset>(
    pool: &mut impl FlowxPool<A, B>,
    proceeds: &mut Balance<B>,
    receipt: FlowxReceipt<B>,
) -> Result<(), EngineError> {
    let owed = receipt.settle();
    let repayment = proceeds.split(owed)?;
    pool.repay_flash_b(repayment)?;
    Ok(())
}

pub fn swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl FlowxPool<A, B>,
    input: Balance<A>,
) -> Result<Balance<B>, EngineError> {
    Ok(pool.swap_a2b(input, MIN_SQRT_PRICE)?)
}

pub fn swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl FlowxPool<A, B>,
    input: Balance<B>,
) -> Result<Balance<A>, EngineError> {
    Ok(pool.swap_b2a(input, MAX_SQRT_PRICE)?)
}
