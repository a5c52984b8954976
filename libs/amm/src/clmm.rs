//! Single-tick CLMM swap model.
//!
//! Within one tick range the liquidity `L` is constant and the Q64.64 sqrt
//! price `s` moves with the swap:
//!
//! - selling A: `s' = L·s / (L + Δa·s)`, output `Δb = L·(s − s')`
//! - selling B: `s' = s + Δb/L`,        output `Δa = L·(s' − s) / (s·s')`
//!
//! Tick crossings are not modeled; past the active range the model simply
//! keeps attenuating output, which under-estimates large trades. That bias is
//! deliberate; the optimizer caps its input and the dry-run catches the
//! rest. Computation is f64 internally: amounts stay below 2^40 and sqrt
//! prices within 2^96/2^64, well inside the 53-bit mantissa for the sizes the
//! optimizer probes.

/// Smallest sqrt price a CLMM swap may reach when traversing down.
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;
/// Largest sqrt price a CLMM swap may reach when traversing up.
pub const MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_055;

const Q64: f64 = 18_446_744_073_709_551_616.0; // 2^64

/// Instantaneous price of A in B implied by a Q64.64 sqrt price.
pub fn spot_price(sqrt_price_q64: u128) -> f64 {
    let s = sqrt_price_q64 as f64 / Q64;
    s * s
}

/// Simulate selling `amount_in` of A for B within the current tick.
/// Returns the output amount of B, or 0 when the pool cannot quote.
pub fn swap_a_for_b(sqrt_price_q64: u128, liquidity: u128, amount_in: u64, fee_bps: u64) -> u64 {
    if liquidity == 0 || sqrt_price_q64 == 0 || amount_in == 0 {
        return 0;
    }
    let after_fee = apply_fee(amount_in, fee_bps);
    if after_fee == 0.0 {
        return 0;
    }

    let s = sqrt_price_q64 as f64 / Q64;
    let l = liquidity as f64;

    let s_next = (l * s / (l + after_fee * s)).max(MIN_SQRT_PRICE as f64 / Q64);
    let out = l * (s - s_next);
    clamp_output(out)
}

/// Simulate selling `amount_in` of B for A within the current tick.
pub fn swap_b_for_a(sqrt_price_q64: u128, liquidity: u128, amount_in: u64, fee_bps: u64) -> u64 {
    if liquidity == 0 || sqrt_price_q64 == 0 || amount_in == 0 {
        return 0;
    }
    let after_fee = apply_fee(amount_in, fee_bps);
    if after_fee == 0.0 {
        return 0;
    }

    let s = sqrt_price_q64 as f64 / Q64;
    let l = liquidity as f64;

    let s_next = (s + after_fee / l).min(MAX_SQRT_PRICE as f64 / Q64);
    let out = l * (s_next - s) / (s * s_next);
    clamp_output(out)
}

fn apply_fee(amount: u64, fee_bps: u64) -> f64 {
    let fee_bps = fee_bps.min(10_000);
    amount as f64 * (10_000 - fee_bps) as f64 / 10_000.0
}

fn clamp_output(out: f64) -> u64 {
    if out.is_finite() && out > 0.0 {
        out as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_SQRT: u128 = 1 << 64; // price 1.0
    const DEEP_LIQUIDITY: u128 = 1 << 50;

    #[test]
    fn spot_price_identity() {
        assert!((spot_price(UNIT_SQRT) - 1.0).abs() < 1e-12);
        // sqrt(4) = 2 → price 4
        assert!((spot_price(2 * UNIT_SQRT) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn small_swap_tracks_spot_price() {
        // Tiny trade against deep liquidity: output ≈ input × price − fee.
        let amount = 1_000_000u64;
        let out = swap_a_for_b(UNIT_SQRT, DEEP_LIQUIDITY, amount, 30);
        let ideal = amount as f64 * 0.997;
        assert!(
            (out as f64 - ideal).abs() / ideal < 0.001,
            "out {out} vs ideal {ideal}"
        );
    }

    #[test]
    fn round_trip_loses_to_fees_and_impact() {
        let amount = 5_000_000u64;
        let mid = swap_a_for_b(UNIT_SQRT, DEEP_LIQUIDITY, amount, 30);
        let back = swap_b_for_a(UNIT_SQRT, DEEP_LIQUIDITY, mid, 30);
        assert!(back < amount, "round trip must not create value");
    }

    #[test]
    fn larger_trades_get_worse_average_price() {
        let small = swap_a_for_b(UNIT_SQRT, DEEP_LIQUIDITY, 1_000_000, 0) as f64 / 1_000_000.0;
        let large =
            swap_a_for_b(UNIT_SQRT, DEEP_LIQUIDITY, 1_000_000_000, 0) as f64 / 1_000_000_000.0;
        assert!(large < small, "price impact should grow with size");
    }

    #[test]
    fn degenerate_pools_quote_zero() {
        assert_eq!(swap_a_for_b(UNIT_SQRT, 0, 1_000, 30), 0);
        assert_eq!(swap_a_for_b(0, DEEP_LIQUIDITY, 1_000, 30), 0);
        assert_eq!(swap_b_for_a(UNIT_SQRT, DEEP_LIQUIDITY, 0, 30), 0);
    }

    #[test]
    fn full_fee_consumes_everything() {
        assert_eq!(swap_a_for_b(UNIT_SQRT, DEEP_LIQUIDITY, 1_000, 10_000), 0);
    }
}
