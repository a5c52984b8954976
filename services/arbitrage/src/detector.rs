//! Opportunity detection: two-hop pairwise scan and tri-hop cycle scan.
//!
//! Prices from different venue families only become comparable after decimal
//! normalization, and the comparison itself runs in `Decimal`: a few parts
//! per million of f64 drift is the same order as the 0.1% detection floor
//! once a 10³ decimal gap has been multiplied through.
//!
//! Direction convention: the flash (source) leg is taken on the venue where
//! the input asset is priced *higher*; the composition shorts the rich
//! venue and buys back on the cheap one. A source venue without a flash
//! primitive means no candidate; Aftermath and the FlowX AMM can only ever
//! be the sell leg, and the FlowX AMM resolves to no strategy at all.

use kestrel_types::{DecimalsMap, Opportunity, PoolSnapshot, StrategyTag, Venue};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Two-hop detection floor: 0.1% spread.
const SPREAD_FLOOR: Decimal = dec!(0.001);
/// Tri-hop detection floor on the composite cross-rate.
const TRI_RATE_FLOOR: Decimal = dec!(1.003);
/// Spreads above this are decimal-normalization bugs, not arbitrage.
const MAX_REALISTIC_SPREAD: Decimal = dec!(0.50);

/// Probe input: one whole unit of a 9-decimal asset. The optimizer resizes.
const PROBE_AMOUNT: u64 = 1_000_000_000;
/// Pre-dry-run gas guesses; replaced by simulated actuals.
const TWO_HOP_GAS_ESTIMATE: u64 = 5_000_000;
const TRI_HOP_GAS_ESTIMATE: u64 = 8_000_000;

/// Fraction of the ideal edge assumed capturable before sizing; the tri-hop
/// factor is far more conservative because three swaps compound impact.
const TWO_HOP_CAPTURE: f64 = 0.5;
const TRI_HOP_CAPTURE: f64 = 0.15;

pub struct Scanner {
    min_profit: u64,
    max_staleness_ms: u64,
    decimals: DecimalsMap,
    scan_count: AtomicU64,
}

impl Scanner {
    pub fn new(min_profit: u64, max_staleness_ms: u64) -> Self {
        Self {
            min_profit,
            max_staleness_ms,
            decimals: DecimalsMap::new(),
            scan_count: AtomicU64::new(0),
        }
    }

    /// O(N²) pairwise scan over same-pair pools.
    /// Returns candidates sorted by expected profit, best first.
    pub fn scan_two_hop(&self, pools: &[PoolSnapshot], now_ms: u64) -> Vec<Opportunity> {
        let mut candidates = Vec::new();
        let mut pairs_checked = 0u32;
        let mut divergences = 0u32;
        let mut best_spread = Decimal::ZERO;

        for i in 0..pools.len() {
            for j in (i + 1)..pools.len() {
                let (left, right) = (&pools[i], &pools[j]);
                if left.staleness_ms(now_ms) > self.max_staleness_ms
                    || right.staleness_ms(now_ms) > self.max_staleness_ms
                {
                    continue;
                }
                if !left.same_pair(right) {
                    continue;
                }
                pairs_checked += 1;

                let Some(candidate) = self.evaluate_pair(left, right, &mut best_spread) else {
                    continue;
                };
                divergences += 1;
                if candidate.expected_profit > self.min_profit {
                    candidates.push(candidate);
                }
            }
        }

        let cycle = self.scan_count.fetch_add(1, Ordering::Relaxed);
        if cycle % 20 == 0 {
            info!(
                cycle,
                pairs_checked,
                divergences,
                candidates = candidates.len(),
                best_spread = %best_spread,
                "scan summary"
            );
        }

        candidates.sort_by(|a, b| b.expected_profit.cmp(&a.expected_profit));
        candidates
    }

    /// Price one pool pair and build a candidate if the spread clears the
    /// floor. The spread magnitude is orientation-independent, but which
    /// pool can be the source is not: the entry layout fixes the input asset
    /// to the sink pool's first coin, so both role assignments are tried and
    /// the rich-venue condition picks the valid one.
    fn evaluate_pair(
        &self,
        left: &PoolSnapshot,
        right: &PoolSnapshot,
        best_spread: &mut Decimal,
    ) -> Option<Opportunity> {
        let price_left = self.normalized_price(left, &left.coin_a, &left.coin_b)?;
        let price_right = self.normalized_price(right, &left.coin_a, &left.coin_b)?;

        let spread = (price_left - price_right).abs() / price_left.min(price_right);
        if spread > *best_spread {
            *best_spread = spread;
        }
        if spread <= SPREAD_FLOOR {
            return None;
        }
        if spread > MAX_REALISTIC_SPREAD {
            debug!(
                left = %left.pool_id, right = %right.pool_id, spread = %spread,
                "implausible spread rejected (decimal mismatch?)"
            );
            return None;
        }

        self.try_roles(left, right, spread)
            .or_else(|| self.try_roles(right, left, spread))
    }

    /// Attempt `source` as the flash leg and `sink` as the recovery leg.
    /// The input asset is whatever the sink stores first; the source must
    /// price that asset strictly richer, or the direction is wrong.
    fn try_roles(
        &self,
        source: &PoolSnapshot,
        sink: &PoolSnapshot,
        spread: Decimal,
    ) -> Option<Opportunity> {
        let input = sink.coin_a.clone();
        let output = sink.coin_b.clone();

        let source_price = self.normalized_price(source, &input, &output)?;
        let sink_price = self.normalized_price(sink, &input, &output)?;
        if source_price <= sink_price {
            return None;
        }

        let source_inverted = source.coin_a != input;
        let tag = resolve_two_hop(source.venue, sink.venue, source_inverted)?;

        let spread_f64 = spread.to_f64().unwrap_or(0.0);
        let expected_profit = (PROBE_AMOUNT as f64 * spread_f64 * TWO_HOP_CAPTURE) as u64;

        let mut type_args = vec![input, output];
        if let Some(fee_type) = turbos_fee_type(&[source, sink]) {
            type_args.push(fee_type);
        }

        debug!(
            tag = ?tag,
            source = %source.pool_id,
            sink = %sink.pool_id,
            spread = %spread,
            expected_profit,
            "two-hop divergence"
        );

        Some(Opportunity {
            tag,
            pool_ids: vec![source.pool_id.clone(), sink.pool_id.clone()],
            type_args,
            amount_in: PROBE_AMOUNT,
            expected_profit,
            estimated_gas: TWO_HOP_GAS_ESTIMATE,
            net_profit: expected_profit as i64 - TWO_HOP_GAS_ESTIMATE as i64,
            detected_at_ms: source.captured_at_ms.min(sink.captured_at_ms),
        })
    }

    /// O(N³) cycle scan: A→B→C→A with the flash leg first. Pruned hard;
    /// triples that do not chain orientations are skipped before pricing.
    pub fn scan_tri_hop(&self, pools: &[PoolSnapshot], now_ms: u64) -> Vec<Opportunity> {
        let fresh: Vec<&PoolSnapshot> = pools
            .iter()
            .filter(|p| p.staleness_ms(now_ms) <= self.max_staleness_ms)
            .collect();

        let mut candidates: Vec<Opportunity> = Vec::new();

        for &first in &fresh {
            if !first.venue.supports_flash() {
                continue;
            }
            for &second in &fresh {
                if std::ptr::eq(first, second) {
                    continue;
                }
                for &third in &fresh {
                    if std::ptr::eq(first, third) || std::ptr::eq(second, third) {
                        continue;
                    }
                    let Some(candidate) = self.evaluate_cycle(first, second, third) else {
                        continue;
                    };
                    if candidate.expected_profit <= self.min_profit {
                        continue;
                    }
                    // The same pool set surfaces once per rotation; keep the
                    // first (they are equivalent candidates).
                    let mut ids = candidate.pool_ids.clone();
                    ids.sort();
                    let duplicate = candidates.iter().any(|c| {
                        let mut existing = c.pool_ids.clone();
                        existing.sort();
                        existing == ids
                    });
                    if !duplicate {
                        candidates.push(candidate);
                    }
                }
            }
        }

        candidates.sort_by(|a, b| b.expected_profit.cmp(&a.expected_profit));
        candidates
    }

    fn evaluate_cycle(
        &self,
        first: &PoolSnapshot,
        second: &PoolSnapshot,
        third: &PoolSnapshot,
    ) -> Option<Opportunity> {
        // Standard template: first = Pool<A,B> flash leg, second = Pool<B,C>,
        // third = Pool<C,A>, every leg in its stored orientation.
        // DeepBook-sourced template: first = Book<A,C>, second = Pool<A,B>,
        // third = Pool<B,C>, cycle closed back on the book, so the A→B edge
        // lives on `second`, not `first`.
        let (tag, asset_a, asset_b, asset_c, edge_ab, edge_bc, edge_ca) =
            if first.venue == Venue::DeepBook {
                let a = &first.coin_a;
                let c = &first.coin_b;
                if &second.coin_a != a || &second.coin_b == c {
                    return None;
                }
                let b = &second.coin_b;
                if &third.coin_a != b || &third.coin_b != c {
                    return None;
                }
                if second.venue != Venue::Cetus || third.venue != Venue::Turbos {
                    return None;
                }
                (StrategyTag::TriDeepBookCetusTurbos, a, b, c, second, third, first)
            } else {
                let a = &first.coin_a;
                let b = &first.coin_b;
                if &second.coin_a != b {
                    return None;
                }
                let c = &second.coin_b;
                if c == a || &third.coin_a != c || &third.coin_b != a {
                    return None;
                }
                let tag = resolve_tri(first.venue, second.venue, third.venue)?;
                (tag, a, b, c, first, second, third)
            };

        let leg_ab = self.directional_price(edge_ab, asset_a, asset_b)?;
        let leg_bc = self.directional_price(edge_bc, asset_b, asset_c)?;
        let leg_ca = self.directional_price(edge_ca, asset_c, asset_a)?;
        let cross_rate = leg_ab * leg_bc * leg_ca;

        if cross_rate <= TRI_RATE_FLOOR || cross_rate > Decimal::ONE + MAX_REALISTIC_SPREAD {
            return None;
        }

        let edge = (cross_rate - Decimal::ONE).to_f64().unwrap_or(0.0);
        let expected_profit = (PROBE_AMOUNT as f64 * edge * TRI_HOP_CAPTURE) as u64;

        let mut type_args = vec![asset_a.clone(), asset_b.clone(), asset_c.clone()];
        if let Some(fee_type) = turbos_fee_type(&[first, second, third]) {
            type_args.push(fee_type);
        }

        debug!(tag = ?tag, cross_rate = %cross_rate, expected_profit, "tri-hop cycle");

        Some(Opportunity {
            tag,
            pool_ids: vec![
                first.pool_id.clone(),
                second.pool_id.clone(),
                third.pool_id.clone(),
            ],
            type_args,
            amount_in: PROBE_AMOUNT,
            expected_profit,
            estimated_gas: TRI_HOP_GAS_ESTIMATE,
            net_profit: expected_profit as i64 - TRI_HOP_GAS_ESTIMATE as i64,
            detected_at_ms: first
                .captured_at_ms
                .min(second.captured_at_ms)
                .min(third.captured_at_ms),
        })
    }

    /// Price of swapping `from` into `to` on the pool that owns this edge of
    /// the cycle.
    fn directional_price(&self, pool: &PoolSnapshot, from: &str, to: &str) -> Option<Decimal> {
        let forward = self.normalized_price(pool, &pool.coin_a, &pool.coin_b)?;
        if pool.coin_a == from && pool.coin_b == to {
            Some(forward)
        } else if pool.coin_b == from && pool.coin_a == to {
            if forward.is_zero() {
                None
            } else {
                Some(Decimal::ONE / forward)
            }
        } else {
            None
        }
    }

    /// Venue price of the pool's own A in B, decimal-normalized, oriented to
    /// `(base, quote)` (inverted when the pool stores the pair backwards).
    fn normalized_price(
        &self,
        pool: &PoolSnapshot,
        base: &str,
        quote: &str,
    ) -> Option<Decimal> {
        let raw = pool.spot_price_a_in_b()?;
        let normalized = self
            .decimals
            .normalize_price(raw, &pool.coin_a, &pool.coin_b);
        let oriented = if pool.coin_a == base && pool.coin_b == quote {
            normalized
        } else if pool.coin_a == quote && pool.coin_b == base {
            if normalized <= 0.0 {
                return None;
            }
            1.0 / normalized
        } else {
            return None;
        };
        Decimal::from_f64(oriented).filter(|d| d.is_sign_positive() && !d.is_zero())
    }
}

/// Map a (source, sink, source-pair-inverted) triple onto the published
/// two-hop entry set. Aftermath and the FlowX AMM cannot source a flash;
/// the FlowX AMM has no composition at all.
fn resolve_two_hop(source: Venue, sink: Venue, source_inverted: bool) -> Option<StrategyTag> {
    use StrategyTag::*;
    use Venue::*;

    match (source, sink, source_inverted) {
        (Cetus, Turbos, false) => Some(CetusToTurbos),
        (Cetus, Turbos, true) => Some(CetusToTurbosRev),
        (Turbos, Cetus, false) => Some(TurbosToCetus),
        (Cetus, DeepBook, false) => Some(CetusToDeepBook),
        (DeepBook, Cetus, false) => Some(DeepBookToCetus),
        (Turbos, DeepBook, false) => Some(TurbosToDeepBook),
        (DeepBook, Turbos, false) => Some(DeepBookToTurbos),
        (Cetus, Aftermath, false) => Some(CetusToAftermath),
        (Cetus, Aftermath, true) => Some(CetusToAftermathRev),
        (Turbos, Aftermath, false) => Some(TurbosToAftermath),
        (DeepBook, Aftermath, false) => Some(DeepBookToAftermath),
        (Cetus, FlowxClmm, false) => Some(CetusToFlowxClmm),
        (FlowxClmm, Cetus, false) => Some(FlowxClmmToCetus),
        (Turbos, FlowxClmm, false) => Some(TurbosToFlowxClmm),
        (FlowxClmm, Turbos, false) => Some(FlowxClmmToTurbos),
        (DeepBook, FlowxClmm, false) => Some(DeepBookToFlowxClmm),
        (FlowxClmm, DeepBook, false) => Some(FlowxClmmToDeepBook),
        _ => None,
    }
}

/// Tri-hop templates with a CLMM flash source, in (flash, mid, close) order.
fn resolve_tri(first: Venue, second: Venue, third: Venue) -> Option<StrategyTag> {
    use StrategyTag::*;
    use Venue::*;

    match (first, second, third) {
        (Cetus, Cetus, Cetus) => Some(TriCetusCetusCetus),
        (Cetus, Cetus, Turbos) => Some(TriCetusCetusTurbos),
        (Cetus, Turbos, DeepBook) => Some(TriCetusTurbosDeepBook),
        (Cetus, DeepBook, Turbos) => Some(TriCetusDeepBookTurbos),
        (Cetus, Cetus, Aftermath) => Some(TriCetusCetusAftermath),
        (Cetus, Turbos, Aftermath) => Some(TriCetusTurbosAftermath),
        (Cetus, Cetus, FlowxClmm) => Some(TriCetusCetusFlowxClmm),
        (Cetus, FlowxClmm, Turbos) => Some(TriCetusFlowxClmmTurbos),
        (FlowxClmm, Cetus, Turbos) => Some(TriFlowxClmmCetusTurbos),
        _ => None,
    }
}

/// The fee-tier type of the first Turbos pool among the legs (templates hold
/// at most one Turbos pool).
fn turbos_fee_type(pools: &[&PoolSnapshot]) -> Option<String> {
    pools
        .iter()
        .find(|p| p.venue == Venue::Turbos)
        .and_then(|p| p.extra_type_arg.clone())
}
