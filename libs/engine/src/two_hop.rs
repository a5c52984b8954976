//! Two-hop compositions: flash-borrow on a source venue, one swap leg on a
//! sink venue, repay, keep the remainder.
//!
//! All seventeen entries share the five-phase shape. The flash swap shorts
//! the input asset on the source venue (debt in the input asset, proceeds in
//! the counter asset); the sink leg buys the input asset back; the profit
//! assertion runs against the receipt's debt before a single unit is repaid.
//! A failed assertion, or any venue abort mid-route, dissolves the receipt
//! and propagates, which on chain is a whole-transaction revert: principal
//! was never at risk.
//!
//! The `_reverse`/`_rev` variants exist because a pool's on-chain pair
//! ordering is fixed at creation; when the source pool stores the pair
//! inverted relative to the route's input asset, the flash swap runs in the
//! b2a direction and the repayment in the b-side asset.

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

// ── Cetus ↔ Turbos ──

pub fn arb_cetus_to_turbos<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    cetus_pool: &mut impl CetusPool<A, B>,
    turbos_pool: &mut impl TurbosPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = cetus::flash_swap_a2b(cetus_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_b2a(turbos_pool, mid, clock))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(cetus_pool, &mut proceeds, receipt)?;
    conclude("arb_cetus_to_turbos", amount, total, proceeds, ctx)
}

/// Source pool stores the pair as `(B, A)`; the flash swap runs b2a and the
/// debt is settled in the pool's b-side asset.
pub fn arb_cetus_to_turbos_reverse<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    cetus_pool: &mut impl CetusPool<B, A>,
    turbos_pool: &mut impl TurbosPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = cetus::flash_swap_b2a(cetus_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_b2a(turbos_pool, mid, clock))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_b(cetus_pool, &mut proceeds, receipt)?;
    conclude("arb_cetus_to_turbos_reverse", amount, total, proceeds, ctx)
}

pub fn arb_turbos_to_cetus<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    turbos_pool: &mut impl TurbosPool<A, B>,
    cetus_pool: &mut impl CetusPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = turbos::flash_swap_a2b(turbos_pool, amount, clock)?;
    let (mut proceeds, receipt) = receipt.across(cetus::swap_b2a(cetus_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    turbos::repay_flash_a(turbos_pool, &mut proceeds, receipt)?;
    conclude("arb_turbos_to_cetus", amount, total, proceeds, ctx)
}

// ── Cetus ↔ DeepBook ──

pub fn arb_cetus_to_deepbook<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    cetus_pool: &mut impl CetusPool<A, B>,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = cetus::flash_swap_a2b(cetus_pool, amount)?;
    let (mut proceeds, receipt) =
        receipt.across(deepbook::buy_base(deepbook_pool, mid, deep_fee, clock, ctx))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(cetus_pool, &mut proceeds, receipt)?;
    conclude("arb_cetus_to_deepbook", amount, total, proceeds, ctx)
}

pub fn arb_deepbook_to_cetus<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    cetus_pool: &mut impl CetusPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (borrowed, loan) = deepbook::flash_borrow_base(deepbook_pool, amount)?;
    let (mid, loan) =
        loan.across(deepbook::sell_base(deepbook_pool, borrowed, deep_fee, clock, ctx))?;
    let (mut proceeds, loan) = loan.across(cetus::swap_b2a(cetus_pool, mid))?;
    let total = proceeds.value();
    let owed = loan.amount();
    let (_, loan) =
        loan.across(crate::profit::assert_profit(total, owed, min_profit))?;
    deepbook::flash_return_base(deepbook_pool, &mut proceeds, loan)?;
    conclude("arb_deepbook_to_cetus", amount, total, proceeds, ctx)
}

// ── Turbos ↔ DeepBook ──

pub fn arb_turbos_to_deepbook<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    turbos_pool: &mut impl TurbosPool<A, B>,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = turbos::flash_swap_a2b(turbos_pool, amount, clock)?;
    let (mut proceeds, receipt) =
        receipt.across(deepbook::buy_base(deepbook_pool, mid, deep_fee, clock, ctx))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    turbos::repay_flash_a(turbos_pool, &mut proceeds, receipt)?;
    conclude("arb_turbos_to_deepbook", amount, total, proceeds, ctx)
}

pub fn arb_deepbook_to_turbos<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    turbos_pool: &mut impl TurbosPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (borrowed, loan) = deepbook::flash_borrow_base(deepbook_pool, amount)?;
    let (mid, loan) =
        loan.across(deepbook::sell_base(deepbook_pool, borrowed, deep_fee, clock, ctx))?;
    let (mut proceeds, loan) = loan.across(turbos::swap_b2a(turbos_pool, mid, clock))?;
    let total = proceeds.value();
    let owed = loan.amount();
    let (_, loan) =
        loan.across(crate::profit::assert_profit(total, owed, min_profit))?;
    deepbook::flash_return_base(deepbook_pool, &mut proceeds, loan)?;
    conclude("arb_deepbook_to_turbos", amount, total, proceeds, ctx)
}

// ── Cetus / Turbos / DeepBook → Aftermath (sell leg only) ──

pub fn arb_cetus_to_aftermath<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    cetus_pool: &mut impl CetusPool<A, B>,
    aftermath_pool: &mut impl AftermathPool<A, B>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = cetus::flash_swap_a2b(cetus_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(aftermath::swap_b2a(aftermath_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(cetus_pool, &mut proceeds, receipt)?;
    conclude("arb_cetus_to_aftermath", amount, total, proceeds, ctx)
}

/// Source pool stores the pair as `(B, A)`.
pub fn arb_cetus_to_aftermath_rev<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    cetus_pool: &mut impl CetusPool<B, A>,
    aftermath_pool: &mut impl AftermathPool<A, B>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = cetus::flash_swap_b2a(cetus_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(aftermath::swap_b2a(aftermath_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_b(cetus_pool, &mut proceeds, receipt)?;
    conclude("arb_cetus_to_aftermath_rev", amount, total, proceeds, ctx)
}

pub fn arb_turbos_to_aftermath<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    turbos_pool: &mut impl TurbosPool<A, B>,
    aftermath_pool: &mut impl AftermathPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = turbos::flash_swap_a2b(turbos_pool, amount, clock)?;
    let (mut proceeds, receipt) = receipt.across(aftermath::swap_b2a(aftermath_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    turbos::repay_flash_a(turbos_pool, &mut proceeds, receipt)?;
    conclude("arb_turbos_to_aftermath", amount, total, proceeds, ctx)
}

pub fn arb_deepbook_to_aftermath<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    aftermath_pool: &mut impl AftermathPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (borrowed, loan) = deepbook::flash_borrow_base(deepbook_pool, amount)?;
    let (mid, loan) =
        loan.across(deepbook::sell_base(deepbook_pool, borrowed, deep_fee, clock, ctx))?;
    let (mut proceeds, loan) = loan.across(aftermath::swap_b2a(aftermath_pool, mid))?;
    let total = proceeds.value();
    let owed = loan.amount();
    let (_, loan) =
        loan.across(crate::profit::assert_profit(total, owed, min_profit))?;
    deepbook::flash_return_base(deepbook_pool, &mut proceeds, loan)?;
    conclude("arb_deepbook_to_aftermath", amount, total, proceeds, ctx)
}

// ── Cetus / Turbos / DeepBook ↔ FlowX CLMM ──

pub fn arb_cetus_to_flowx_clmm<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    cetus_pool: &mut impl CetusPool<A, B>,
    flowx_pool: &mut impl FlowxPool<A, B>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = cetus::flash_swap_a2b(cetus_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(flowx::swap_b2a(flowx_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.debt();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    cetus::repay_flash_a(cetus_pool, &mut proceeds, receipt)?;
    conclude("arb_cetus_to_flowx_clmm", amount, total, proceeds, ctx)
}

pub fn arb_flowx_clmm_to_cetus<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    flowx_pool: &mut impl FlowxPool<A, B>,
    cetus_pool: &mut impl CetusPool<A, B>,
    amount: u64,
    min_profit: u64,
    _clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = flowx::flash_swap_a2b(flowx_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(cetus::swap_b2a(cetus_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    flowx::repay_flash_a(flowx_pool, &mut proceeds, receipt)?;
    conclude("arb_flowx_clmm_to_cetus", amount, total, proceeds, ctx)
}

pub fn arb_turbos_to_flowx_clmm<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    turbos_pool: &mut impl TurbosPool<A, B>,
    flowx_pool: &mut impl FlowxPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = turbos::flash_swap_a2b(turbos_pool, amount, clock)?;
    let (mut proceeds, receipt) = receipt.across(flowx::swap_b2a(flowx_pool, mid))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    turbos::repay_flash_a(turbos_pool, &mut proceeds, receipt)?;
    conclude("arb_turbos_to_flowx_clmm", amount, total, proceeds, ctx)
}

pub fn arb_flowx_clmm_to_turbos<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    flowx_pool: &mut impl FlowxPool<A, B>,
    turbos_pool: &mut impl TurbosPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = flowx::flash_swap_a2b(flowx_pool, amount)?;
    let (mut proceeds, receipt) = receipt.across(turbos::swap_b2a(turbos_pool, mid, clock))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    flowx::repay_flash_a(flowx_pool, &mut proceeds, receipt)?;
    conclude("arb_flowx_clmm_to_turbos", amount, total, proceeds, ctx)
}

pub fn arb_deepbook_to_flowx_clmm<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    flowx_pool: &mut impl FlowxPool<A, B>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (borrowed, loan) = deepbook::flash_borrow_base(deepbook_pool, amount)?;
    let (mid, loan) =
        loan.across(deepbook::sell_base(deepbook_pool, borrowed, deep_fee, clock, ctx))?;
    let (mut proceeds, loan) = loan.across(flowx::swap_b2a(flowx_pool, mid))?;
    let total = proceeds.value();
    let owed = loan.amount();
    let (_, loan) =
        loan.across(crate::profit::assert_profit(total, owed, min_profit))?;
    deepbook::flash_return_base(deepbook_pool, &mut proceeds, loan)?;
    conclude("arb_deepbook_to_flowx_clmm", amount, total, proceeds, ctx)
}

pub fn arb_flowx_clmm_to_deepbook<A: Asset, B: Asset>(
    _cap: &AdminCap,
    pause: &PauseSwitch,
    flowx_pool: &mut impl FlowxPool<A, B>,
    deepbook_pool: &mut impl DeepBookPool<A, B>,
    deep_fee: Coin<DEEP>,
    amount: u64,
    min_profit: u64,
    clock: &Clock,
    ctx: &mut TxContext,
) -> Result<(), EngineError> {
    entry_guard(amount, pause)?;
    let (mid, receipt) = flowx::flash_swap_a2b(flowx_pool, amount)?;
    let (mut proceeds, receipt) =
        receipt.across(deepbook::buy_base(deepbook_pool, mid, deep_fee, clock, ctx))?;
    let total = proceeds.value();
    let debt = receipt.assumed_repayment();
    let (_, receipt) =
        receipt.across(crate::profit::assert_profit(total, debt, min_profit))?;
    flowx::repay_flash_a(flowx_pool, &mut proceeds, receipt)?;
    conclude("arb_flowx_clmm_to_deepbook", amount, total, proceeds, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Balance;
    use crate::error::VenueError;
    use crate::testkit::{Alpha, Beta, MockVenue};
    use crate::{deploy, Clock, TxContext};

    const SUI_UNIT: u64 = 1_000_000_000;
    const DEPTH: u128 = 1_000_000_000_000_000; // 1e15: spread dwarfs impact

    fn rich() -> MockVenue<Alpha, Beta> {
        // Quotes 1.01 B per A.
        MockVenue::with_reserves(DEPTH, DEPTH + DEPTH / 100)
    }

    fn flat() -> MockVenue<Alpha, Beta> {
        // Quotes 1.0000 B per A.
        MockVenue::with_reserves(DEPTH, DEPTH)
    }

    fn deep_coin(value: u64) -> Coin<DEEP> {
        Coin::from_balance(Balance::new(value))
    }

    #[test]
    fn spread_executes_and_emits() {
        let (cap, pause) = deploy();
        let mut source = rich();
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        arb_cetus_to_turbos(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1_000_000, &clock, &mut ctx,
        )
        .expect("1% spread against deep books must execute");

        assert_eq!(source.outstanding_debt(), 0, "flash debt settled");
        let events = ctx.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].strategy(), "arb_cetus_to_turbos");
        assert_eq!(events[0].amount_in(), SUI_UNIT);
        assert!(events[0].profit() >= 1_000_000, "profit {}", events[0].profit());
        // Remainder credited to the sender equals the emitted profit.
        assert_eq!(ctx.credits().len(), 1);
        assert_eq!(ctx.credits()[0].amount, events[0].profit());
    }

    #[test]
    fn zero_spread_reverts_with_not_profitable() {
        let (cap, pause) = deploy();
        let mut source = flat();
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        let err = arb_cetus_to_turbos(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1, &clock, &mut ctx,
        )
        .unwrap_err();

        assert_eq!(err, EngineError::NotProfitable);
        // The debt was never repaid: on chain the unconsumed receipt reverts
        // the transaction, so nothing the sender owns moved.
        assert_ne!(source.outstanding_debt(), 0);
        assert!(ctx.events().is_empty());
        assert!(ctx.credits().is_empty());
    }

    #[test]
    fn paused_entry_fails_before_any_effect() {
        let (cap, mut pause) = deploy();
        pause.pause(&cap);
        let mut source = rich();
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        let err = arb_cetus_to_turbos(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1, &clock, &mut ctx,
        )
        .unwrap_err();

        assert_eq!(err, EngineError::Paused);
        assert!(!source.touched() && !sink.touched(), "no asset effects while paused");
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn zero_amount_rejected() {
        let (cap, pause) = deploy();
        let mut source = rich();
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        let err =
            arb_cetus_to_turbos(&cap, &pause, &mut source, &mut sink, 0, 1, &clock, &mut ctx)
                .unwrap_err();
        assert_eq!(err, EngineError::ZeroAmount);
    }

    #[test]
    fn self_describing_receipt_covers_flash_fee() {
        let (cap, pause) = deploy();
        // 2% spread, 30 bps flash fee: still profitable, and the repayment
        // must match the venue-reported pay amount, not the request.
        let mut source = MockVenue::<Alpha, Beta>::with_reserves(DEPTH, DEPTH + DEPTH / 50);
        source.set_flash_fee_bps(30);
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        arb_cetus_to_turbos(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1, &clock, &mut ctx,
        )
        .expect("fee-aware repayment settles");
        assert_eq!(source.outstanding_debt(), 0);
    }

    #[test]
    fn opaque_receipt_aborts_when_venue_adds_a_fee() {
        let (cap, pause) = deploy();
        // Turbos as flash source with a (hypothetical future) flash fee: the
        // adapter repays the requested amount, the venue demands more, and
        // its own assertion aborts the transaction.
        let mut source = MockVenue::<Alpha, Beta>::with_reserves(DEPTH, DEPTH + DEPTH / 50);
        source.set_flash_fee_bps(30);
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        let err = arb_turbos_to_cetus(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1, &clock, &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Venue(VenueError::RepaymentShort { .. })
        ));
    }

    #[test]
    fn reverse_variant_handles_inverted_source_ordering() {
        let (cap, pause) = deploy();
        // Source pool stores (B, A): B-in-A price of 1/1.01 means A is rich.
        let mut source = MockVenue::<Beta, Alpha>::with_reserves(DEPTH + DEPTH / 100, DEPTH);
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        arb_cetus_to_turbos_reverse(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1_000_000, &clock, &mut ctx,
        )
        .expect("inverted source pair executes");
        assert_eq!(source.outstanding_debt(), 0);
        assert_eq!(ctx.events()[0].strategy(), "arb_cetus_to_turbos_reverse");

        // Same inverted-source shape against the weighted sink.
        let mut source = MockVenue::<Beta, Alpha>::with_reserves(DEPTH + DEPTH / 100, DEPTH);
        let mut aftermath = flat();
        let mut ctx = TxContext::new("0xfeed");
        arb_cetus_to_aftermath_rev(
            &cap, &pause, &mut source, &mut aftermath, SUI_UNIT, 1_000_000, &clock, &mut ctx,
        )
        .expect("inverted source pair executes against aftermath");
        assert_eq!(source.outstanding_debt(), 0);
    }

    #[test]
    fn deepbook_source_round_trip_returns_loan_and_fee_change() {
        let (cap, pause) = deploy();
        let mut book = rich();
        book.set_deep_fee_required(1_000);
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        arb_deepbook_to_cetus(
            &cap,
            &pause,
            &mut book,
            deep_coin(5_000),
            &mut sink,
            SUI_UNIT,
            1_000_000,
            &clock,
            &mut ctx,
        )
        .expect("book-sourced round trip executes");

        assert_eq!(book.outstanding_debt(), 0, "loan returned");
        // Unused DEEP came home alongside the profit.
        let deep_change = ctx
            .credits()
            .iter()
            .find(|c| c.asset == DEEP::TYPE_NAME)
            .expect("fee remainder credited");
        assert_eq!(deep_change.amount, 4_000);
    }

    #[test]
    fn deepbook_partial_fill_dust_goes_home() {
        let (cap, pause) = deploy();
        let mut source = rich();
        let mut book = flat();
        // The book only fills 90% of what the flash leg produces; the rest
        // must come back to the sender as dust, not vanish.
        book.set_fill_limit(SUI_UNIT * 9 / 10);
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        // With only 90% filled the route is unprofitable; the point here is
        // the dust ledger, not the profit outcome.
        let _ = arb_cetus_to_deepbook(
            &cap,
            &pause,
            &mut source,
            &mut book,
            deep_coin(0),
            SUI_UNIT,
            1,
            &clock,
            &mut ctx,
        );
        assert!(
            ctx.credits().iter().any(|c| c.asset == Beta::TYPE_NAME && c.amount > 0),
            "unfilled input returned to sender: {:?}",
            ctx.credits()
        );
    }

    #[test]
    fn aftermath_leg_disables_venue_slippage() {
        let (cap, pause) = deploy();
        let mut source = rich();
        let mut sink = flat();
        let clock = Clock::new(0);
        let mut ctx = TxContext::new("0xfeed");

        arb_cetus_to_aftermath(
            &cap, &pause, &mut source, &mut sink, SUI_UNIT, 1_000_000, &clock, &mut ctx,
        )
        .expect("aftermath sell leg executes");
        assert_eq!(sink.last_slippage(), Some(u64::MAX));
        assert_eq!(sink.last_min_out(), Some(1));
    }

    #[test]
    fn every_flash_sink_pairing_has_an_entry() {
        // Exercise the remaining pairings once each against a profitable
        // spread so the full 17-variant surface stays wired.
        let clock = Clock::new(0);

        macro_rules! run {
            ($entry:ident) => {{
                let (cap, pause) = deploy();
                let mut source = rich();
                let mut sink = flat();
                let mut ctx = TxContext::new("0xfeed");
                $entry(&cap, &pause, &mut source, &mut sink, SUI_UNIT, 1, &clock, &mut ctx)
                    .expect(stringify!($entry));
                assert_eq!(source.outstanding_debt(), 0);
            }};
            ($entry:ident, fee_after_source) => {{
                let (cap, pause) = deploy();
                let mut source = rich();
                let mut sink = flat();
                let mut ctx = TxContext::new("0xfeed");
                $entry(
                    &cap,
                    &pause,
                    &mut source,
                    deep_coin(0),
                    &mut sink,
                    SUI_UNIT,
                    1,
                    &clock,
                    &mut ctx,
                )
                .expect(stringify!($entry));
                assert_eq!(source.outstanding_debt(), 0);
            }};
            ($entry:ident, fee_after_sink) => {{
                let (cap, pause) = deploy();
                let mut source = rich();
                let mut sink = flat();
                let mut ctx = TxContext::new("0xfeed");
                $entry(
                    &cap,
                    &pause,
                    &mut source,
                    &mut sink,
                    deep_coin(0),
                    SUI_UNIT,
                    1,
                    &clock,
                    &mut ctx,
                )
                .expect(stringify!($entry));
                assert_eq!(source.outstanding_debt(), 0);
            }};
        }

        run!(arb_turbos_to_cetus);
        run!(arb_cetus_to_deepbook, fee_after_sink);
        run!(arb_turbos_to_deepbook, fee_after_sink);
        run!(arb_deepbook_to_turbos, fee_after_source);
        run!(arb_turbos_to_aftermath);
        run!(arb_deepbook_to_aftermath, fee_after_source);
        run!(arb_cetus_to_flowx_clmm);
        run!(arb_flowx_clmm_to_cetus);
        run!(arb_turbos_to_flowx_clmm);
        run!(arb_flowx_clmm_to_turbos);
        run!(arb_deepbook_to_flowx_clmm, fee_after_source);
        run!(arb_flowx_clmm_to_deepbook, fee_after_sink);
    }

    #[test]
    #[should_panic(expected = "flash receipt dropped without settlement")]
    fn leaked_receipt_is_a_hot_potato() {
        let mut pool = rich();
        let (_mid, _receipt) =
            crate::venues::cetus::flash_swap_a2b(&mut pool, SUI_UNIT).unwrap();
        // Dropping _receipt here without settling must panic.
    }
}
