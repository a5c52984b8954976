//! Turbos CLMM adapter.
//!
//! Turbos traffics in coins, needs the clock on every swap, and its flash
//! receipt exposes no debt reader. The adapter therefore records the
//! originally requested amount as the assumed repayment; should the venue
//! ever introduce a flash fee, settlement falls short and the venue's own
//! assertion aborts the transaction. Safe, but operationally blocking.

use super::{DebtGuard, Obligation, MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use crate::asset::Asset;
use crate::coin::{Balance, Coin};
use crate::context::Clock;
use crate::error::{EngineError, VenueError};
use std::marker::PhantomData;

/// External interface of a Turbos `Pool<A, B, Fee>`.
pub trait TurbosPool<A: Asset, B: Asset> {
    fn swap_a2b(
        &mut self,
        input: Coin<A>,
        sqrt_price_limit: u128,
        clock: &Clock,
    ) -> Result<Coin<B>, VenueError>;
    fn swap_b2a(
        &mut self,
        input: Coin<B>,
        sqrt_price_limit: u128,
        clock: &Clock,
    ) -> Result<Coin<A>, VenueError>;
    fn flash_swap_a2b(
        &mut self,
        amount: u64,
        sqrt_price_limit: u128,
        clock: &Clock,
    ) -> Result<Coin<B>, VenueError>;
    fn flash_swap_b2a(
        &mut self,
        amount: u64,
        sqrt_price_limit: u128,
        clock: &Clock,
    ) -> Result<Coin<A>, VenueError>;
    fn repay_flash_a(&mut self, repayment: Coin<A>) -> Result<(), VenueError>;
    fn repay_flash_b(&mut self, repayment: Coin<B>) -> Result<(), VenueError>;
}

/// Opaque flash receipt: no debt reader, so settlement repays exactly the
/// requested amount.
#[must_use = "a flash receipt must be settled before the transaction ends"]
#[derive(Debug)]
pub struct TurbosReceipt<Debt: Asset> {
    assumed_repayment: u64,
    guard: DebtGuard,
    _asset: PhantomData<Debt>,
}

impl<Debt: Asset> TurbosReceipt<Debt> {
    fn new(amount: u64) -> Self {
        Self {
            assumed_repayment: amount,
            guard: DebtGuard::armed(),
            _asset: PhantomData,
        }
    }

    /// The originally requested amount, standing in for the unreadable debt.
    pub fn assumed_repayment(&self) -> u64 {
        self.assumed_repayment
    }

    fn settle(mut self) -> u64 {
        self.guard.defuse();
        self.assumed_repayment
    }
}

impl<Debt: Asset> Obligation for TurbosReceipt<Debt> {
    fn dissolve(mut self) {
        self.guard.defuse();
    }
}

pub fn flash_swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl TurbosPool<A, B>,
    amount: u64,
    clock: &Clock,
) -> Result<(Balance<B>, TurbosReceipt<A>), EngineError> {
    let out = pool.flash_swap_a2b(amount, MIN_SQRT_PRICE, clock)?;
    Ok((out.into_balance(), TurbosReceipt::new(amount)))
}

pub fn flash_swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl TurbosPool<A, B>,
    amount: u64,
    clock: &Clock,
) -> Result<(Balance<A>, TurbosReceipt<B>), EngineError> {
    let out = pool.flash_swap_b2a(amount, MAX_SQRT_PRICE, clock)?;
    Ok((out.into_balance(), TurbosReceipt::new(amount)))
}

pub fn repay_flash_a<A: Asset, B: Asset>(
    pool: &mut impl TurbosPool<A, B>,
    proceeds: &mut Balance<A>,
    receipt: TurbosReceipt<A>,
) -> Result<(), EngineError> {
    let owed = receipt.settle();
    let repayment = proceeds.split(owed)?;
    pool.repay_flash_a(Coin::from_balance(repayment))?;
    Ok(())
}

pub fn repay_flash_b<A: Asset, B: Asset>(
    pool: &mut impl TurbosPool<A, B>,
    proceeds: &mut Balance<B>,
    receipt: TurbosReceipt<B>,
) -> Result<(), EngineError> {
    let owed = receipt.settle();
    let repayment = proceeds.split(owed)?;
    pool.repay_flash_b(Coin::from_balance(repayment))?;
    Ok(())
}

pub fn swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl TurbosPool<A, B>,
    input: Balance<A>,
    clock: &Clock,
) -> Result<Balance<B>, EngineError> {
    let out = pool.swap_a2b(Coin::from_balance(input), MIN_SQRT_PRICE, clock)?;
    Ok(out.into_balance())
}

pub fn swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl TurbosPool<A, B>,
    input: Balance<B>,
    clock: &Clock,
) -> Result<Balance<A>, EngineError> {
    let out = pool.swap_b2a(Coin::from_balance(input), MAX_SQRT_PRICE, clock)?;
    Ok(out.into_balance())
}
