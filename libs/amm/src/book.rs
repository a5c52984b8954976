//! Top-of-book fill model for the order-book venue.
//!
//! Only the best level is modeled: price from the quote, quantity capped by
//! the published depth at that level. Input beyond the depth is treated as
//! unfilled and contributes nothing, which makes oversized trades strictly
//! worse, which is the shape the sizing search relies on.

/// Sell `amount_base` into the best bid. Returns quote received.
pub fn fill_sell_base(bid: f64, bid_depth: u64, amount_base: u64, taker_fee_bps: u64) -> u64 {
    if !(bid > 0.0) || bid_depth == 0 || amount_base == 0 {
        return 0;
    }
    let filled = amount_base.min(bid_depth);
    let gross = filled as f64 * bid;
    after_fee(gross, taker_fee_bps)
}

/// Spend `amount_quote` at the best ask. Returns base received, capped by the
/// depth resting at the ask.
pub fn fill_buy_base(ask: f64, ask_depth: u64, amount_quote: u64, taker_fee_bps: u64) -> u64 {
    if !(ask > 0.0) || ask_depth == 0 || amount_quote == 0 {
        return 0;
    }
    let wanted = amount_quote as f64 / ask;
    let filled = wanted.min(ask_depth as f64);
    after_fee(filled, taker_fee_bps)
}

fn after_fee(gross: f64, fee_bps: u64) -> u64 {
    let fee_bps = fee_bps.min(10_000);
    let net = gross * (10_000 - fee_bps) as f64 / 10_000.0;
    if net.is_finite() && net > 0.0 {
        net as u64
    } else {
        0
    }
}
