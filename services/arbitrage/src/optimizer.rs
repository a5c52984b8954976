//! Input sizing: ternary search over locally simulated route profit.
//!
//! Each leg of a candidate is simulated against its cached snapshot; the
//! CLMM single-tick model, the weighted curve, or the top-of-book fill;
//! and the search maximizes `route_out − amount − gas`. Under the
//! single-tick approximation the objective is concave (spread capture grows
//! sublinearly, impact superlinearly), which is what makes ternary search
//! sound. The input cap keeps the approximation honest: beyond ~100 SUI a
//! real swap starts crossing ticks the model does not see.

use kestrel_amm::{book, clmm, cpmm, ternary_search};
use kestrel_types::{Opportunity, PoolSnapshot, StrategyTag, Venue};
use tracing::debug;

/// 100 SUI in MIST; the single-tick model's trust region.
pub const MAX_INPUT: u64 = 100_000_000_000;

/// Fallback when a snapshot carries no fee field.
const DEFAULT_FEE_BPS: u64 = 30;

pub struct Optimizer {
    max_input: u64,
}

impl Optimizer {
    pub fn new() -> Self {
        Self {
            max_input: MAX_INPUT,
        }
    }

    #[cfg(test)]
    fn with_max_input(max_input: u64) -> Self {
        Self { max_input }
    }

    /// Re-size a scanner candidate against current snapshots. Returns false
    /// when the route cannot clear gas at any size; the candidate is dead.
    pub fn refine(&self, opp: &mut Opportunity, pools: &[PoolSnapshot]) -> bool {
        let Some(legs) = leg_plan(opp, pools) else {
            debug!(tag = ?opp.tag, "optimizer: leg snapshots missing");
            return false;
        };
        let gas = opp.estimated_gas;

        let objective = |amount: u64| -> i64 {
            let mut flow = amount;
            for (snapshot, from) in &legs {
                flow = simulate_swap(snapshot, from, flow);
                if flow == 0 {
                    break;
                }
            }
            flow as i64 - amount as i64 - gas as i64
        };

        let (best_amount, best_net) = ternary_search(1, self.max_input, objective);
        if best_net <= 0 {
            debug!(tag = ?opp.tag, best_net, "optimizer: no profitable size");
            return false;
        }

        debug!(
            tag = ?opp.tag,
            probe_amount = opp.amount_in,
            sized_amount = best_amount,
            net = best_net,
            "optimizer: sized"
        );
        opp.amount_in = best_amount;
        opp.expected_profit = (best_net + gas as i64) as u64;
        opp.refresh_net();
        true
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the candidate's legs to `(snapshot, input asset)` pairs, in
/// route order. The DeepBook-sourced cycle stores its book first but routes
/// through it last.
fn leg_plan(opp: &Opportunity, pools: &[PoolSnapshot]) -> Option<Vec<(PoolSnapshot, String)>> {
    let find = |id: &str| pools.iter().find(|p| p.pool_id == id).cloned();

    let asset = |i: usize| opp.type_args.get(i).cloned();
    let order: Vec<(usize, usize)> = if opp.tag == StrategyTag::TriDeepBookCetusTurbos {
        // Book<A,C> first in the layout; the route is AB, BC, then the book.
        vec![(1, 0), (2, 1), (0, 2)]
    } else if opp.tag.is_tri_hop() {
        vec![(0, 0), (1, 1), (2, 2)]
    } else {
        vec![(0, 0), (1, 1)]
    };

    let mut legs = Vec::with_capacity(order.len());
    for (pool_index, from_index) in order {
        let snapshot = find(opp.pool_ids.get(pool_index)?)?;
        legs.push((snapshot, asset(from_index)?));
    }
    Some(legs)
}

/// Simulate one swap of `amount_in` units of `from` on this pool, using the
/// model its venue family calls for.
fn simulate_swap(pool: &PoolSnapshot, from: &str, amount_in: u64) -> u64 {
    let fee_bps = pool.fee_bps.unwrap_or(DEFAULT_FEE_BPS);
    let selling_a = pool.coin_a == from;
    if !selling_a && pool.coin_b != from {
        return 0;
    }

    match pool.venue {
        Venue::Cetus | Venue::Turbos | Venue::FlowxClmm => {
            let (Some(sqrt_price), Some(liquidity)) = (pool.sqrt_price, pool.liquidity) else {
                return 0;
            };
            if selling_a {
                clmm::swap_a_for_b(sqrt_price, liquidity, amount_in, fee_bps)
            } else {
                clmm::swap_b_for_a(sqrt_price, liquidity, amount_in, fee_bps)
            }
        }
        Venue::Aftermath | Venue::FlowxAmm => {
            let (Some(ra), Some(rb)) = (pool.reserve_a, pool.reserve_b) else {
                return 0;
            };
            let (wa, wb) = (pool.weight_a.unwrap_or(0.5), pool.weight_b.unwrap_or(0.5));
            if selling_a {
                cpmm::weighted_out(ra, wa, rb, wb, amount_in, fee_bps)
            } else {
                cpmm::weighted_out(rb, wb, ra, wa, amount_in, fee_bps)
            }
        }
        Venue::DeepBook => {
            if selling_a {
                let (Some(bid), Some(depth)) = (pool.best_bid, pool.bid_depth) else {
                    return 0;
                };
                book::fill_sell_base(bid, depth, amount_in, fee_bps)
            } else {
                let (Some(ask), Some(depth)) = (pool.best_ask, pool.ask_depth) else {
                    return 0;
                };
                book::fill_buy_base(ask, depth, amount_in, fee_bps)
            }
        }
    }
}
