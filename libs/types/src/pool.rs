//! Normalized pool snapshots across heterogeneous venue protocols.
//!
//! Each venue exposes price in its own shape: a Q64.64 square-root price for
//! the CLMM family, best bid/ask for the order book, raw reserves for the
//! weighted AMM. [`PoolSnapshot`] carries the union of those fields so the
//! scanner can compare venues through one [`PoolSnapshot::spot_price_a_in_b`]
//! call.

use serde::{Deserialize, Serialize};

/// Which venue protocol a pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    /// Cetus CLMM; flash swap with a self-describing receipt.
    Cetus,
    /// Turbos CLMM; flash swap with an opaque receipt.
    Turbos,
    /// DeepBook CLOB; hot-potato flash loans on the base asset.
    DeepBook,
    /// Aftermath weighted AMM; sell leg only, no flash primitive.
    Aftermath,
    /// FlowX CLMM; flash swap with an opaque receipt.
    FlowxClmm,
    /// FlowX constant-product AMM; observed but never composed on-chain.
    FlowxAmm,
}

impl Venue {
    /// Parse the venue name used in `MONITORED_POOLS` entries.
    pub fn from_config_name(name: &str) -> Option<Venue> {
        match name.to_ascii_lowercase().as_str() {
            "cetus" => Some(Venue::Cetus),
            "turbos" => Some(Venue::Turbos),
            "deepbook" => Some(Venue::DeepBook),
            "aftermath" => Some(Venue::Aftermath),
            "flowx_clmm" | "flowx" => Some(Venue::FlowxClmm),
            "flowx_amm" => Some(Venue::FlowxAmm),
            _ => None,
        }
    }

    /// Whether the venue offers a flash-borrow primitive usable as the
    /// source leg of a composition.
    pub fn supports_flash(&self) -> bool {
        matches!(
            self,
            Venue::Cetus | Venue::Turbos | Venue::DeepBook | Venue::FlowxClmm
        )
    }

    /// CLMM family venues price through a Q64.64 sqrt price.
    pub fn is_clmm(&self) -> bool {
        matches!(self, Venue::Cetus | Venue::Turbos | Venue::FlowxClmm)
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Venue::Cetus => "cetus",
            Venue::Turbos => "turbos",
            Venue::DeepBook => "deepbook",
            Venue::Aftermath => "aftermath",
            Venue::FlowxClmm => "flowx_clmm",
            Venue::FlowxAmm => "flowx_amm",
        };
        f.write_str(name)
    }
}

/// Point-in-time state of one monitored pool, normalized across venues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Sui object ID of the pool.
    pub pool_id: String,
    pub venue: Venue,
    /// Fully qualified coin type of side A (e.g. `0x2::sui::SUI`).
    pub coin_a: String,
    /// Fully qualified coin type of side B.
    pub coin_b: String,

    /// Q64.64 square-root price (CLMM family only).
    pub sqrt_price: Option<u128>,
    /// Current tick index (CLMM family only).
    pub tick_index: Option<i32>,
    /// Active liquidity in the current tick range (CLMM family only).
    pub liquidity: Option<u128>,
    /// Swap fee in basis points.
    pub fee_bps: Option<u64>,

    /// Reserve of A (weighted AMM and constant-product pools).
    pub reserve_a: Option<u64>,
    /// Reserve of B.
    pub reserve_b: Option<u64>,
    /// Advertised normalized weight of A (weighted AMM; 0.5 when balanced).
    pub weight_a: Option<f64>,
    /// Advertised normalized weight of B.
    pub weight_b: Option<f64>,

    /// Best bid price, quote per base (order book only).
    pub best_bid: Option<f64>,
    /// Best ask price.
    pub best_ask: Option<f64>,
    /// Resting quantity at the best bid, in base units.
    pub bid_depth: Option<u64>,
    /// Resting quantity at the best ask, in base units.
    pub ask_depth: Option<u64>,

    /// When this snapshot was captured (ms since Unix epoch).
    pub captured_at_ms: u64,

    /// Extra type parameter some venues require in entry calls
    /// (Turbos pools carry their fee tier as a third type argument).
    pub extra_type_arg: Option<String>,
}

impl PoolSnapshot {
    /// CLMM pools with less active liquidity than this report no price.
    /// A near-empty tick range has a sqrt price, but it is meaningless and
    /// manufactures phantom spreads against healthy pools.
    pub const MIN_CLMM_LIQUIDITY: u128 = 10_000_000;

    /// Raw spot price of A in terms of B, before decimal normalization.
    ///
    /// CLMM: `(sqrt_price / 2^64)^2`, gated on minimum liquidity.
    /// Weighted/constant-product: `(reserve_b / weight_b) / (reserve_a / weight_a)`.
    /// Order book: bid/ask midpoint, or whichever side exists.
    pub fn spot_price_a_in_b(&self) -> Option<f64> {
        match self.venue {
            Venue::Cetus | Venue::Turbos | Venue::FlowxClmm => {
                if self.liquidity.unwrap_or(0) < Self::MIN_CLMM_LIQUIDITY {
                    return None;
                }
                self.sqrt_price.map(|sp| {
                    let root = sp as f64 / (1u128 << 64) as f64;
                    root * root
                })
            }
            Venue::Aftermath | Venue::FlowxAmm => {
                let (a, b) = (self.reserve_a?, self.reserve_b?);
                if a == 0 {
                    return None;
                }
                let wa = self.weight_a.unwrap_or(0.5);
                let wb = self.weight_b.unwrap_or(0.5);
                if wa <= 0.0 || wb <= 0.0 {
                    return None;
                }
                // Weighted spot price: (B/wB) / (A/wA). Collapses to B/A for
                // the balanced 50/50 case.
                Some((b as f64 / wb) / (a as f64 / wa))
            }
            Venue::DeepBook => {
                // Vault balances are resting order inventory, not a price.
                // Only the book itself prices a CLOB.
                match (self.best_bid, self.best_ask) {
                    (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
                    (Some(bid), None) => Some(bid),
                    (None, Some(ask)) => Some(ask),
                    (None, None) => None,
                }
            }
        }
    }

    /// Age of this snapshot relative to `now_ms`.
    pub fn staleness_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.captured_at_ms)
    }

    /// True when both pools trade the same coin pair, in either order.
    pub fn same_pair(&self, other: &PoolSnapshot) -> bool {
        (self.coin_a == other.coin_a && self.coin_b == other.coin_b)
            || (self.coin_a == other.coin_b && self.coin_b == other.coin_a)
    }

    /// True when the pool trades exactly this pair, in either order.
    pub fn has_pair(&self, x: &str, y: &str) -> bool {
        (self.coin_a == x && self.coin_b == y) || (self.coin_a == y && self.coin_b == x)
    }
}
