//! Deterministic mock venue for composition tests.
//!
//! One constant-product pool that implements every venue trait, so a single
//! fixture can stand in for any leg. Flash debts are tracked explicitly:
//! after an aborted composition the outstanding debt is observable, which is
//! how tests pin down "the transaction would have reverted".

use crate::asset::{Asset, DEEP};
use crate::coin::{Balance, Coin};
use crate::context::Clock;
use crate::error::VenueError;
use crate::venues::aftermath::AftermathPool;
use crate::venues::cetus::CetusPool;
use crate::venues::deepbook::DeepBookPool;
use crate::venues::flowx::FlowxPool;
use crate::venues::turbos::TurbosPool;
use std::marker::PhantomData;

pub(crate) struct Alpha;
impl Asset for Alpha {
    const TYPE_NAME: &'static str = "0xaaaa::alpha::ALPHA";
}

pub(crate) struct Beta;
impl Asset for Beta {
    const TYPE_NAME: &'static str = "0xbbbb::beta::BETA";
}

pub(crate) struct Gamma;
impl Asset for Gamma {
    const TYPE_NAME: &'static str = "0xcccc::gamma::GAMMA";
}

/// Constant-product mock pool over the asset pair `(A, B)`.
pub(crate) struct MockVenue<A: Asset, B: Asset> {
    reserve_a: u128,
    reserve_b: u128,
    swap_fee_bps: u64,
    flash_fee_bps: u64,
    outstanding_debt: u64,
    deep_fee_required: u64,
    fill_limit: Option<u64>,
    last_slippage: Option<u64>,
    last_min_out: Option<u64>,
    touched: bool,
    _pair: PhantomData<(A, B)>,
}

impl<A: Asset, B: Asset> MockVenue<A, B> {
    pub(crate) fn with_reserves(reserve_a: u128, reserve_b: u128) -> Self {
        Self {
            reserve_a,
            reserve_b,
            swap_fee_bps: 0,
            flash_fee_bps: 0,
            outstanding_debt: 0,
            deep_fee_required: 0,
            fill_limit: None,
            last_slippage: None,
            last_min_out: None,
            touched: false,
            _pair: PhantomData,
        }
    }

    pub(crate) fn set_flash_fee_bps(&mut self, bps: u64) {
        self.flash_fee_bps = bps;
    }

    pub(crate) fn set_deep_fee_required(&mut self, amount: u64) {
        self.deep_fee_required = amount;
    }

    pub(crate) fn set_fill_limit(&mut self, limit: u64) {
        self.fill_limit = Some(limit);
    }

    pub(crate) fn outstanding_debt(&self) -> u64 {
        self.outstanding_debt
    }

    pub(crate) fn touched(&self) -> bool {
        self.touched
    }

    pub(crate) fn last_slippage(&self) -> Option<u64> {
        self.last_slippage
    }

    pub(crate) fn last_min_out(&self) -> Option<u64> {
        self.last_min_out
    }

    fn fill_a2b(&mut self, amount_in: u64) -> u64 {
        self.touched = true;
        let after_fee = amount_in as u128 * (10_000 - self.swap_fee_bps) as u128 / 10_000;
        if after_fee == 0 || self.reserve_a == 0 || self.reserve_b == 0 {
            return 0;
        }
        let out = after_fee * self.reserve_b / (self.reserve_a + after_fee);
        self.reserve_a += after_fee;
        self.reserve_b -= out;
        out as u64
    }

    fn fill_b2a(&mut self, amount_in: u64) -> u64 {
        self.touched = true;
        let after_fee = amount_in as u128 * (10_000 - self.swap_fee_bps) as u128 / 10_000;
        if after_fee == 0 || self.reserve_a == 0 || self.reserve_b == 0 {
            return 0;
        }
        let out = after_fee * self.reserve_a / (self.reserve_b + after_fee);
        self.reserve_b += after_fee;
        self.reserve_a -= out;
        out as u64
    }

    fn open_debt(&mut self, amount: u64) -> u64 {
        let debt = amount + amount * self.flash_fee_bps / 10_000;
        self.outstanding_debt = debt;
        debt
    }

    fn settle_debt(&mut self, provided: u64) -> Result<(), VenueError> {
        if provided < self.outstanding_debt {
            return Err(VenueError::RepaymentShort {
                provided,
                required: self.outstanding_debt,
            });
        }
        self.outstanding_debt = 0;
        Ok(())
    }

    fn capped(&self, amount_in: u64) -> (u64, u64) {
        match self.fill_limit {
            Some(limit) if amount_in > limit => (limit, amount_in - limit),
            _ => (amount_in, 0),
        }
    }
}

impl<A: Asset, B: Asset> CetusPool<A, B> for MockVenue<A, B> {
    fn swap_a2b(&mut self, input: Balance<A>, _limit: u128) -> Result<Balance<B>, VenueError> {
        let out = self.fill_a2b(input.value());
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Balance::new(out))
    }

    fn swap_b2a(&mut self, input: Balance<B>, _limit: u128) -> Result<Balance<A>, VenueError> {
        let out = self.fill_b2a(input.value());
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Balance::new(out))
    }

    fn flash_swap_a2b(
        &mut self,
        amount: u64,
        _limit: u128,
    ) -> Result<(Balance<B>, u64), VenueError> {
        let out = self.fill_a2b(amount);
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok((Balance::new(out), self.open_debt(amount)))
    }

    fn flash_swap_b2a(
        &mut self,
        amount: u64,
        _limit: u128,
    ) -> Result<(Balance<A>, u64), VenueError> {
        let out = self.fill_b2a(amount);
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok((Balance::new(out), self.open_debt(amount)))
    }

    fn repay_flash_a(&mut self, repayment: Balance<A>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }

    fn repay_flash_b(&mut self, repayment: Balance<B>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }
}

impl<A: Asset, B: Asset> TurbosPool<A, B> for MockVenue<A, B> {
    fn swap_a2b(
        &mut self,
        input: Coin<A>,
        _limit: u128,
        _clock: &Clock,
    ) -> Result<Coin<B>, VenueError> {
        let out = self.fill_a2b(input.value());
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Coin::from_balance(Balance::new(out)))
    }

    fn swap_b2a(
        &mut self,
        input: Coin<B>,
        _limit: u128,
        _clock: &Clock,
    ) -> Result<Coin<A>, VenueError> {
        let out = self.fill_b2a(input.value());
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Coin::from_balance(Balance::new(out)))
    }

    fn flash_swap_a2b(
        &mut self,
        amount: u64,
        _limit: u128,
        _clock: &Clock,
    ) -> Result<Coin<B>, VenueError> {
        let out = self.fill_a2b(amount);
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        self.open_debt(amount);
        Ok(Coin::from_balance(Balance::new(out)))
    }

    fn flash_swap_b2a(
        &mut self,
        amount: u64,
        _limit: u128,
        _clock: &Clock,
    ) -> Result<Coin<A>, VenueError> {
        let out = self.fill_b2a(amount);
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        self.open_debt(amount);
        Ok(Coin::from_balance(Balance::new(out)))
    }

    fn repay_flash_a(&mut self, repayment: Coin<A>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }

    fn repay_flash_b(&mut self, repayment: Coin<B>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }
}

impl<A: Asset, B: Asset> FlowxPool<A, B> for MockVenue<A, B> {
    fn swap_a2b(&mut self, input: Balance<A>, _limit: u128) -> Result<Balance<B>, VenueError> {
        let out = self.fill_a2b(input.value());
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Balance::new(out))
    }

    fn swap_b2a(&mut self, input: Balance<B>, _limit: u128) -> Result<Balance<A>, VenueError> {
        let out = self.fill_b2a(input.value());
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Balance::new(out))
    }

    fn flash_swap_a2b(&mut self, amount: u64, _limit: u128) -> Result<Balance<B>, VenueError> {
        let out = self.fill_a2b(amount);
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        self.open_debt(amount);
        Ok(Balance::new(out))
    }

    fn flash_swap_b2a(&mut self, amount: u64, _limit: u128) -> Result<Balance<A>, VenueError> {
        let out = self.fill_b2a(amount);
        if out == 0 {
            return Err(VenueError::InsufficientLiquidity);
        }
        self.open_debt(amount);
        Ok(Balance::new(out))
    }

    fn repay_flash_a(&mut self, repayment: Balance<A>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }

    fn repay_flash_b(&mut self, repayment: Balance<B>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }
}

impl<A: Asset, B: Asset> DeepBookPool<A, B> for MockVenue<A, B> {
    fn swap_exact_base_for_quote(
        &mut self,
        base: Coin<A>,
        mut deep_fee: Coin<DEEP>,
        _clock: &Clock,
    ) -> Result<(Coin<B>, Coin<A>, Coin<DEEP>), VenueError> {
        if deep_fee.value() < self.deep_fee_required {
            return Err(VenueError::Abort(101));
        }
        let fee = deep_fee
            .split(self.deep_fee_required)
            .map_err(|_| VenueError::Abort(101))?;
        drop(fee.into_balance());

        let mut input = base.into_balance();
        let (filled, rest) = self.capped(input.value());
        let out = self.fill_a2b(filled);
        let rest_balance = input.split(rest).map_err(|_| VenueError::Abort(102))?;
        drop(input); // consumed by the fill
        Ok((
            Coin::from_balance(Balance::new(out)),
            Coin::from_balance(rest_balance),
            deep_fee,
        ))
    }

    fn swap_exact_quote_for_base(
        &mut self,
        quote: Coin<B>,
        mut deep_fee: Coin<DEEP>,
        _clock: &Clock,
    ) -> Result<(Coin<A>, Coin<B>, Coin<DEEP>), VenueError> {
        if deep_fee.value() < self.deep_fee_required {
            return Err(VenueError::Abort(101));
        }
        let fee = deep_fee
            .split(self.deep_fee_required)
            .map_err(|_| VenueError::Abort(101))?;
        drop(fee.into_balance());

        let mut input = quote.into_balance();
        let (filled, rest) = self.capped(input.value());
        let out = self.fill_b2a(filled);
        let rest_balance = input.split(rest).map_err(|_| VenueError::Abort(102))?;
        drop(input);
        Ok((
            Coin::from_balance(Balance::new(out)),
            Coin::from_balance(rest_balance),
            deep_fee,
        ))
    }

    fn borrow_flashloan_base(&mut self, amount: u64) -> Result<Coin<A>, VenueError> {
        self.touched = true;
        self.outstanding_debt = amount;
        Ok(Coin::from_balance(Balance::new(amount)))
    }

    fn return_flashloan_base(&mut self, repayment: Coin<A>) -> Result<(), VenueError> {
        self.settle_debt(repayment.value())
    }
}

impl<A: Asset, B: Asset> AftermathPool<A, B> for MockVenue<A, B> {
    fn swap_exact_in_a2b(
        &mut self,
        input: Coin<A>,
        slippage: u64,
        min_out: u64,
    ) -> Result<Coin<B>, VenueError> {
        self.last_slippage = Some(slippage);
        self.last_min_out = Some(min_out);
        let out = self.fill_a2b(input.value());
        if out < min_out {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Coin::from_balance(Balance::new(out)))
    }

    fn swap_exact_in_b2a(
        &mut self,
        input: Coin<B>,
        slippage: u64,
        min_out: u64,
    ) -> Result<Coin<A>, VenueError> {
        self.last_slippage = Some(slippage);
        self.last_min_out = Some(min_out);
        let out = self.fill_b2a(input.value());
        if out < min_out {
            return Err(VenueError::InsufficientLiquidity);
        }
        Ok(Coin::from_balance(Balance::new(out)))
    }
}
