//! Constant-product and weighted-pool swap models.

/// Output of an `x·y = k` swap with a basis-point fee on the input side.
/// Integer math throughout; widened to u128 for the product.
pub fn constant_product_out(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    fee_bps: u64,
) -> u64 {
    if reserve_in == 0 || reserve_out == 0 || amount_in == 0 {
        return 0;
    }
    let fee_bps = fee_bps.min(10_000);
    let after_fee = amount_in as u128 * (10_000 - fee_bps) as u128 / 10_000;
    if after_fee == 0 {
        return 0;
    }
    let numerator = after_fee * reserve_out as u128;
    let denominator = reserve_in as u128 + after_fee;
    (numerator / denominator) as u64
}

/// Output of a weighted-pool swap (Balancer-style):
///
/// `out = reserve_out · (1 − (reserve_in / (reserve_in + in))^(w_in/w_out))`
///
/// Collapses to the constant-product curve when the weights are equal.
/// Weights are the advertised normalized weights; invalid weights quote zero.
pub fn weighted_out(
    reserve_in: u64,
    weight_in: f64,
    reserve_out: u64,
    weight_out: f64,
    amount_in: u64,
    fee_bps: u64,
) -> u64 {
    if reserve_in == 0 || reserve_out == 0 || amount_in == 0 {
        return 0;
    }
    if !(weight_in > 0.0 && weight_out > 0.0) {
        return 0;
    }
    let fee_bps = fee_bps.min(10_000);
    let after_fee = amount_in as f64 * (10_000 - fee_bps) as f64 / 10_000.0;

    let base = reserve_in as f64 / (reserve_in as f64 + after_fee);
    let ratio = base.powf(weight_in / weight_out);
    let out = reserve_out as f64 * (1.0 - ratio);
    if out.is_finite() && out > 0.0 {
        out as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_product_reference_value() {
        // 100 in against 1000/2000 reserves at 0.3%: ≈ 181.
        let out = constant_product_out(1_000, 2_000, 100, 30);
        assert!((180..=182).contains(&out), "got {out}");
    }

    #[test]
    fn constant_product_zero_guards() {
        assert_eq!(constant_product_out(0, 2_000, 100, 30), 0);
        assert_eq!(constant_product_out(1_000, 0, 100, 30), 0);
        assert_eq!(constant_product_out(1_000, 2_000, 0, 30), 0);
    }

    #[test]
    fn output_bounded_by_reserves() {
        // Arbitrarily large input can never drain the out reserve.
        let out = constant_product_out(1_000, 2_000, u64::MAX, 0);
        assert!(out < 2_000);
    }

    #[test]
    fn balanced_weights_match_constant_product() {
        let cp = constant_product_out(1_000_000, 3_000_000, 50_000, 25);
        let w = weighted_out(1_000_000, 0.5, 3_000_000, 0.5, 50_000, 25);
        let diff = (cp as i64 - w as i64).abs();
        assert!(diff <= 2, "cp {cp} vs weighted {w}");
    }

    #[test]
    fn skewed_weights_shift_the_curve() {
        // Heavier input weight → the curve punishes input size more.
        let heavy_in = weighted_out(1_000_000, 0.8, 1_000_000, 0.2, 100_000, 0);
        let light_in = weighted_out(1_000_000, 0.2, 1_000_000, 0.8, 100_000, 0);
        assert!(heavy_in > light_in, "{heavy_in} vs {light_in}");
    }

    #[test]
    fn weighted_invalid_weights_quote_zero() {
        assert_eq!(weighted_out(1_000, 0.0, 1_000, 0.5, 100, 0), 0);
        assert_eq!(weighted_out(1_000, 0.5, 1_000, -1.0, 100, 0), 0);
    }
}
