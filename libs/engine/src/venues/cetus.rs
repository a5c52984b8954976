//! Cetus CLMM adapter.
//!
//! Cetus traffics in raw balances and its flash swap reports the exact
//! repayment owed, so this is the one venue whose receipt is self-describing:
//! the adapter reads `pay_amount` from the venue instead of assuming it.

use super::{DebtGuard, Obligation, MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use crate::asset::Asset;
use crate::coin::Balance;
use crate::error::{EngineError, VenueError};
use std::marker::PhantomData;

/// External interface of a Cetus `Pool<A, B>`.
///
/// Flash swaps return the output alongside the venue-computed `pay_amount`
/// (principal plus flash fee) that settlement must provide.
pub trait CetusPool<A: Asset, B: Asset> {
    fn swap_a2b(&mut self, input: Balance<A>, sqrt_price_limit: u128)
        -> Result<Balance<B>, VenueError>;
    fn swap_b2a(&mut self, input: Balance<B>, sqrt_price_limit: u128)
        -> Result<Balance<A>, VenueError>;
    fn flash_swap_a2b(
        &mut self,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> Result<(Balance<B>, u64), VenueError>;
    fn flash_swap_b2a(
        &mut self,
        amount: u64,
        sqrt_price_limit: u128,
    ) -> Result<(Balance<A>, u64), VenueError>;
    fn repay_flash_a(&mut self, repayment: Balance<A>) -> Result<(), VenueError>;
    fn repay_flash_b(&mut self, repayment: Balance<B>) -> Result<(), VenueError>;
}

/// Self-describing flash receipt: the debt is queryable.
#[must_use = "a flash receipt must be settled before the transaction ends"]
#[derive(Debug)]
pub struct CetusReceipt<Debt: Asset> {
    debt: u64,
    guard: DebtGuard,
    _asset: PhantomData<Debt>,
}

impl<Debt: Asset> CetusReceipt<Debt> {
    fn new(debt: u64) -> Self {
        Self {
            debt,
            guard: DebtGuard::armed(),
            _asset: PhantomData,
        }
    }

    /// Exact repayment owed, as reported by the venue.
    pub fn debt(&self) -> u64 {
        self.debt
    }

    fn settle(mut self) -> u64 {
        self.guard.defuse();
        self.debt
    }
}

impl<Debt: Asset> Obligation for CetusReceipt<Debt> {
    fn dissolve(mut self) {
        self.guard.defuse();
    }
}

/// Flash swap A→B: receive B now, owe A at settlement.
pub fn flash_swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl CetusPool<A, B>,
    amount: u64,
) -> Result<(Balance<B>, CetusReceipt<A>), EngineError> {
    let (out, pay_amount) = pool.flash_swap_a2b(amount, MIN_SQRT_PRICE)?;
    Ok((out, CetusReceipt::new(pay_amount)))
}

/// Flash swap B→A: receive A now, owe B at settlement.
pub fn flash_swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl CetusPool<A, B>,
    amount: u64,
) -> Result<(Balance<A>, CetusReceipt<B>), EngineError> {
    let (out, pay_amount) = pool.flash_swap_b2a(amount, MAX_SQRT_PRICE)?;
    Ok((out, CetusReceipt::new(pay_amount)))
}

/// Settle an A-denominated flash debt out of `proceeds`.
pub fn repay_flash_a<A: Asset, B: Asset>(
    pool: &mut impl CetusPool<A, B>,
    proceeds: &mut Balance<A>,
    receipt: CetusReceipt<A>,
) -> Result<(), EngineError> {
    let debt = receipt.settle();
    let repayment = proceeds.split(debt)?;
    pool.repay_flash_a(repayment)?;
    Ok(())
}

/// Settle a B-denominated flash debt out of `proceeds`.
pub fn repay_flash_b<A: Asset, B: Asset>(
    pool: &mut impl CetusPool<A, B>,
    proceeds: &mut Balance<B>,
    receipt: CetusReceipt<B>,
) -> Result<(), EngineError> {
    let debt = receipt.settle();
    let repayment = proceeds.split(debt)?;
    pool.repay_flash_b(repayment)?;
    Ok(())
}

/// Plain swap A→B across the full range.
pub fn swap_a2b<A: Asset, B: Asset>(
    pool: &mut impl CetusPool<A, B>,
    input: Balance<A>,
) -> Result<Balance<B>, EngineError> {
    Ok(pool.swap_a2b(input, MIN_SQRT_PRICE)?)
}

/// Plain swap B→A across the full range.
pub fn swap_b2a<A: Asset, B: Asset>(
    pool: &mut impl CetusPool<A, B>,
    input: Balance<B>,
) -> Result<Balance<A>, EngineError> {
    Ok(pool.swap_b2a(input, MAX_SQRT_PRICE)?)
}
