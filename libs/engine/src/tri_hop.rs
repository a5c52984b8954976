//! Tri-hop compositions: a flash borrow of A, routed A→B→C→A across three
//! pools, repaid from the closing leg.
//!
//! The cycle is linearized into straight-line legs; the scanner guarantees
//! the pools chain (`pool_ab`, `pool_bc`, `pool_ca`) before an entry is ever
//! called, and a mismatched cycle simply fails its profit assertion. The
//! DeepBook-sourced template borrows the base asset from its `(A, C)` book
//! and closes the cycle with a market buy on the same book.

use crate::admin::{AdminCap, PauseSwitch};
use crate::asset::{Asset, DEEP};
use crate::coin::Coin;
use crate::context::{Clock, TxContext};
use crate::error::EngineError;
use crate::venues::aftermath::{self, AftermathPool};
use crate::venues::cetus::{self, CetusPool};
use crate::venues::deepbook::{self, DeepBookPool};
use crate::venues::flowx::{self, FlowxPool};
use crate::venues::turbos::{self, TurbosPool};
use crate::venues::Obligation;
use crate::{conclude, entry_guard};

pub fn tri_cetus_cetus_cetus<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl CetusPool<B, C>,
    pool_ca: &mut impl CetusPool<C, A>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(cetus::swap_a2b(pool_bc, leg_b))?;
    let (mut proceeds, receipt) = receipt.across(cetus::swap_a2b(pool_ca, leg_c))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_cetus_cetus", amount, total, proceeds, ctx)
}

pub fn tri_cetus_cetus_turbos<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl CetusPool<B, C>,
    pool_ca: &mut impl TurbosPool<C, A>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(cetus::swap_a2b(pool_bc, leg_b))?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_a2b(pool_ca, leg_c, clock))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_cetus_turbos", amount, total, proceeds, ctx)
}

pub fn tri_cetus_turbos_deepbook<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl TurbosPool<B, C>,
    pool_ca: &mut impl DeepBookPool<C, A>,
    deep_fee: Coin<DEEP>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(turbos::swap_a2b(pool_bc, leg_b, clock))?;
    let (mut proceeds, receipt) =
        receipt.across(deepbook::sell_base(pool_ca, leg_c, deep_fee, clock, ctx))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_turbos_deepbook", amount, total, proceeds, ctx)
}

pub fn tri_cetus_deepbook_turbos<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl DeepBookPool<B, C>,
    deep_fee: Coin<DEEP>,
    pool_ca: &mut impl TurbosPool<C, A>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) =
        receipt.across(deepbook::sell_base(pool_bc, leg_b, deep_fee, clock, ctx))?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_a2b(pool_ca, leg_c, clock))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_deepbook_turbos", amount, total, proceeds, ctx)
}

/// Borrow A from the `(A, C)` book, route A→B→C through the AMM legs, close
/// C→A with a market buy on the same book, return the loan.
pub fn tri_deepbook_cetus_turbos<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ac: &mut impl DeepBookPool<A, C>,
    deep_fee: Coin<DEEP>,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl TurbosPool<B, C>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (borrowed, loan) = deepbook::flash_borrow_base(pool_ac, amount)?;
    let (leg_b, loan) = loan.across(cetus::swap_a2b(pool_ab, borrowed))?;
    let (leg_c, loan) = loan.across(turbos::swap_a2b(pool_bc, leg_b, clock))?;
    let (mut proceeds, loan) =
        loan.across(deepbook::buy_base(pool_ac, leg_c, deep_fee, clock, ctx))?;
    let total = proceeds.value();
    let owed = loan.amount();
    let (_, loan) =
        loan.across(crate::profit::assert_profit(total, owed, min_profit))?;
    deepbook::flash_return_base(pool_ac, &mut proceeds, loan)?;
    conclude("tri_deepbook_cetus_turbos", amount, total, proceeds, ctx)
}

pub fn tri_cetus_cetus_aftermath<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl CetusPool<B, C>,
    pool_ca: &mut impl AftermathPool<C, A>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(cetus::swap_a2b(pool_bc, leg_b))?;
    let (mut proceeds, receipt) = receipt.across(aftermath::swap_a2b(pool_ca, leg_c))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_cetus_aftermath", amount, total, proceeds, ctx)
}

pub fn tri_cetus_turbos_aftermath<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl TurbosPool<B, C>,
    pool_ca: &mut impl AftermathPool<C, A>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(turbos::swap_a2b(pool_bc, leg_b, clock))?;
    let (mut proceeds, receipt) = receipt.across(aftermath::swap_a2b(pool_ca, leg_c))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_turbos_aftermath", amount, total, proceeds, ctx)
}

pub fn tri_cetus_cetus_flowx_clmm<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl CetusPool<B, C>,
    pool_ca: &mut impl FlowxPool<C, A>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(cetus::swap_a2b(pool_bc, leg_b))?;
    let (mut proceeds, receipt) = receipt.across(flowx::swap_a2b(pool_ca, leg_c))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_cetus_flowx_clmm", amount, total, proceeds, ctx)
}

pub fn tri_cetus_flowx_clmm_turbos<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl CetusPool<A, B>,
    pool_bc: &mut impl FlowxPool<B, C>,
    pool_ca: &mut impl TurbosPool<C, A>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = cetus::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(flowx::swap_a2b(pool_bc, leg_b))?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_a2b(pool_ca, leg_c, clock))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_cetus_flowx_clmm_turbos", amount, total, proceeds, ctx)
}

pub fn tri_flowx_clmm_cetus_turbos<A: Asset, B: Asset, C: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    pool_ab: &mut impl FlowxPool<A, B>,
    pool_bc: &mut impl CetusPool<B, C>,
    pool_ca: &mut impl TurbosPool<C, A>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (leg_b, receipt) = flowx::flash_swap_a2b(pool_ab, amount)?;
    let (leg_c, receipt) = receipt.across(cetus::swap_a2b(pool_bc, leg_b))?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_a2b(pool_ca, leg_c, clock))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    flowx::repay_flash_a(pool_ab, &mut proceeds, receipt)?;
    conclude("tri_flowx_clmm_cetus_turbos", amount, total, proceeds, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Balance;
    use crate::testkit::{Alpha, Beta, Gamma, MockVenue};
    use crate::{deploy, Clock, TxContext};

    const SUI_UNIT: u64 = 1_000_000_000;
    const DEPTH: u128 = 1_000_000_000_000_000;

    fn rich_ab() -> MockVenue<Alpha, Beta> {
        MockVenue::with_reserves(DEPTH, DEPTH + DEPTH / 100)
    }

    fn flat_bc() -> MockVenue<Beta, Gamma> {
        MockVenue::with_reserves(DEPTH, DEPTH)
    }

    fn flat_ca() -> MockVenue<Gamma, Alpha> {
        MockVenue::with_reserves(DEPTH, DEPTH)
    }

    fn deep_coin(value: u64) -> Coin<DEEP> {
        Coin::from_balance(Balance::new(value))
    }

    #[test]
    fn cycle_with_edge_executes() {
        let (cap, pause) = deploy();
        let (mut ab, mut bc, mut ca) = (rich_ab(), flat_bc(), flat_ca());
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        tri_cetus_cetus_cetus(
            &cap, &pause, &mut ab, &mut bc, &mut ca, SUI_UNIT, 1_000_000, &clock, &mut ctx,
        )
        .expect("1% cycle edge executes");

        assert_eq!(ab.outstanding_debt(), 0);
        let event = &ctx.events()[0];
        assert_eq!(event.strategy(), "tri_cetus_cetus_cetus");
        assert_eq!(event.amount_in(), SUI_UNIT);
        assert!(event.profit() >= 1_000_000);
    }

    #[test]
    fn balanced_cycle_reverts() {
        let (cap, pause) = deploy();
        let mut ab = MockVenue::<Alpha, Beta>::with_reserves(DEPTH, DEPTH);
        let (mut bc, mut ca) = (flat_bc(), flat_ca());
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        let err = tri_cetus_cetus_cetus(
            &cap, &pause, &mut ab, &mut bc, &mut ca, SUI_UNIT, 1, &clock, &mut ctx,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::NotProfitable);
        assert_ne!(ab.outstanding_debt(), 0, "unsettled receipt = whole-tx revert");
        assert!(ctx.credits().is_empty());
    }

    #[test]
    fn deepbook_closing_leg_cycle() {
        let (cap, pause) = deploy();
        let (mut ab, mut bc) = (rich_ab(), flat_bc());
        let mut ca = flat_ca();
        ca.set_deep_fee_required(500);
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        tri_cetus_turbos_deepbook(
            &cap,
            &pause,
            &mut ab,
            &mut bc,
            &mut ca,
            deep_coin(2_000),
            SUI_UNIT,
            1_000_000,
            &clock,
            &mut ctx,
        )
        .expect("book-closed cycle executes");
        assert_eq!(ab.outstanding_debt(), 0);
    }

    #[test]
    fn deepbook_sourced_cycle() {
        let (cap, pause) = deploy();
        // Book holds the (A, C) pair; its A price is rich so shorting A
        // through the cycle closes with a profit.
        let mut ac = MockVenue::<Alpha, Gamma>::with_reserves(DEPTH, DEPTH);
        let mut ab = rich_ab();
        let mut bc = flat_bc();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        tri_deepbook_cetus_turbos(
            &cap,
            &pause,
            &mut ac,
            deep_coin(0),
            &mut ab,
            &mut bc,
            SUI_UNIT,
            1_000_000,
            &clock,
            &mut ctx,
        )
        .expect("book-sourced cycle executes");
        assert_eq!(ac.outstanding_debt(), 0, "loan returned");
    }

    #[test]
    fn unsettled_cycle_never_credits() {
        // A mid-route venue abort must dissolve the receipt and leave no
        // trace in the context.
        let (cap, pause) = deploy();
        let mut ab = rich_ab();
        let mut bc = MockVenue::<Beta, Gamma>::with_reserves(0, 0); // cannot quote
        let mut ca = flat_ca();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        let err = tri_cetus_cetus_cetus(
            &cap, &pause, &mut ab, &mut bc, &mut ca, SUI_UNIT, 1, &clock, &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Venue(_)));
        assert!(ctx.events().is_empty());
        assert!(ctx.credits().is_empty());
    }

    #[test]
    fn remaining_templates_stay_wired() {
        let clock = Clock::new(0);

        macro_rules! run {
            ($entry:ident) => {{
                let (cap, pause) = deploy();
                let (mut ab, mut bc, mut ca) = (rich_ab(), flat_bc(), flat_ca());
                let mut ctx = TxContext::new("0xfeed");
                $entry(&cap, &pause, &mut ab, &mut bc, &mut ca, SUI_UNIT, 1, &clock, &mut ctx)
                    .expect(stringify!($entry));
                assert_eq!(ab.outstanding_debt(), 0);
            }};
        }

        run!(tri_cetus_cetus_turbos);
        run!(tri_cetus_cetus_aftermath);
        run!(tri_cetus_turbos_aftermath);
        run!(tri_cetus_cetus_flowx_clmm);
        run!(tri_cetus_flowx_clmm_turbos);
        run!(tri_flowx_clmm_cetus_turbos);

        // The book-in-the-middle template threads its fee coin after pool_bc.
        let (cap, pause) = deploy();
        let (mut ab, mut bc, mut ca) = (rich_ab(), flat_bc(), flat_ca());
        let mut ctx = TxContext::new("0xfeed");
        tri_cetus_deepbook_turbos(
            &cap,
            &pause,
            &mut ab,
            &mut bc,
            deep_coin(0),
            &mut ca,
            SUI_UNIT,
            1,
            &clock,
            &mut ctx,
        )
        .expect("tri_cetus_deepbook_turbos");
        assert_eq!(ab.outstanding_debt(), 0);
    }
}
