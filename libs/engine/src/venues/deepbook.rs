//! DeepBook CLOB adapter.
//!
//! The order book has no swap-with-debt primitive; instead it lends its base
//! asset through a hot-potato flash loan and fills market orders against the
//! book. Taker fees are paid in DEEP, so every book leg threads a fee coin
//! through and sends the remainder home. Market orders can partially fill;
//! the unfilled input comes back as a remainder the dust rule handles.

use super::{sweep, DebtGuard, Obligation};
use crate::asset::{Asset, DEEP};
use crate::coin::{Balance, Coin};
use crate::context::{Clock, TxContext};
use crate::error::{EngineError, VenueError};
use std::marker::PhantomData;

/// External interface of a DeepBook `Pool<Base, Quote>`.
///
/// Swap calls return `(output, input remainder, fee remainder)`; the loan
/// pair moves the base asset against an obligation to return the same
/// amount before the transaction commits.
pub trait DeepBookPool<Base: Asset, Quote: Asset> {
    fn swap_exact_base_for_quote(
        &mut self,
        base: Coin<Base>,
        deep_fee: Coin<DEEP>,
        clock: &Clock,
    ) -> Result<(Coin<Quote>, Coin<Base>, Coin<DEEP>), VenueError>;
    fn swap_exact_quote_for_base(
        &mut self,
        quote: Coin<Quote>,
        deep_fee: Coin<DEEP>,
        clock: &Clock,
    ) -> Result<(Coin<Base>, Coin<Quote>, Coin<DEEP>), VenueError>;
    fn borrow_flashloan_base(&mut self, amount: u64) -> Result<Coin<Base>, VenueError>;
    fn return_flashloan_base(&mut self, repayment: Coin<Base>) -> Result<(), VenueError>;
}

/// Hot-potato loan of the base asset. Fee-free today, so the return amount
/// equals the borrowed amount.
#[must_use = "a flash loan must be returned before the transaction ends"]
#[derive(Debug)]
pub struct DeepBookLoan<Base: Asset> {
    amount: u64,
    guard: DebtGuard,
    _asset: PhantomData<Base>,
}

impl<Base: Asset> DeepBookLoan<Base> {
    fn new(amount: u64) -> Self {
        Self {
            amount,
            guard: DebtGuard::armed(),
            _asset: PhantomData,
        }
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    fn settle(mut self) -> u64 {
        self.guard.defuse();
        self.amount
    }
}

impl<Base: Asset> Obligation for DeepBookLoan<Base> {
    fn dissolve(mut self) {
        self.guard.defuse();
    }
}

/// Borrow `amount` of the base asset against a hot-potato loan.
pub fn flash_borrow_base<Base: Asset, Quote: Asset>(
    pool: &mut impl DeepBookPool<Base, Quote>,
    amount: u64,
) -> Result<(Balance<Base>, DeepBookLoan<Base>), EngineError> {
    let coin = pool.borrow_flashloan_base(amount)?;
    Ok((coin.into_balance(), DeepBookLoan::new(amount)))
}

/// Return a base-asset flash loan out of `proceeds`.
pub fn flash_return_base<Base: Asset, Quote: Asset>(
    pool: &mut impl DeepBookPool<Base, Quote>,
    proceeds: &mut Balance<Base>,
    loan: DeepBookLoan<Base>,
) -> Result<(), EngineError> {
    let owed = loan.settle();
    let repayment = proceeds.split(owed)?;
    pool.return_flashloan_base(Coin::from_balance(repayment))?;
    Ok(())
}

/// Market-sell base for quote. Remainders follow the dust rule.
pub fn sell_base<Base: Asset, Quote: Asset>(
    pool: &mut impl DeepBookPool<Base, Quote>,
    input: Balance<Base>,
    deep_fee: Coin<DEEP>,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<Balance<Quote>, EngineError> {
    let (out, base_rest, deep_rest) =
        pool.swap_exact_base_for_quote(Coin::from_balance(input), deep_fee, clock)?;
    sweep(base_rest, ctx)?;
    sweep(deep_rest, ctx)?;
    Ok(out.into_balance())
}

/// Market-buy base with quote. Remainders follow the dust rule.
pub fn buy_base<Base: Asset, Quote: Asset>(
    pool: &mut impl DeepBookPool<Base, Quote>,
    input: Balance<Quote>,
    deep_fee: Coin<DEEP>,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<Balance<Base>, EngineError> {
    let (out, quote_rest, deep_rest) =
        pool.swap_exact_quote_for_base(Coin::from_balance(input), deep_fee, clock)?;
    sweep(quote_rest, ctx)?;
    sweep(deep_rest, ctx)?;
    Ok(out.into_balance())
}
