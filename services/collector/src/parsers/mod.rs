//! Venue-specific pool-object parsers.
//!
//! Node responses are venue-shaped Move JSON; each parser extracts the price
//! surface a venue exposes into a [`PoolSnapshot`]. The contract is
//! tolerance: missing, null, or malformed fields produce `None` (one dropped
//! snapshot), never a collector abort.

pub mod aftermath;
pub mod cetus;
pub mod deepbook;
pub mod flowx_amm;
pub mod flowx_clmm;
pub mod turbos;

use kestrel_types::{PoolSnapshot, Venue};
use serde_json::Value;

/// Identity of a monitored pool, carried from configuration into every
/// snapshot the parsers produce.
#[derive(Debug, Clone)]
pub struct PoolMeta {
    pub pool_id: String,
    pub venue: Venue,
    pub coin_a: String,
    pub coin_b: String,
}

impl PoolMeta {
    /// A snapshot skeleton with identity and timestamp filled in; parsers
    /// add the venue-specific price surface.
    fn blank_snapshot(&self, now_ms: u64) -> PoolSnapshot {
        PoolSnapshot {
            pool_id: self.pool_id.clone(),
            venue: self.venue,
            coin_a: self.coin_a.clone(),
            coin_b: self.coin_b.clone(),
            sqrt_price: None,
            tick_index: None,
            liquidity: None,
            fee_bps: None,
            reserve_a: None,
            reserve_b: None,
            weight_a: None,
            weight_b: None,
            best_bid: None,
            best_ask: None,
            bid_depth: None,
            ask_depth: None,
            captured_at_ms: now_ms,
            extra_type_arg: None,
        }
    }
}

/// Route object content to the right venue parser.
pub fn parse_snapshot(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    match meta.venue {
        Venue::Cetus => cetus::parse(content, meta, now_ms),
        Venue::Turbos => turbos::parse(content, meta, now_ms),
        Venue::DeepBook => deepbook::parse(content, meta, now_ms),
        Venue::Aftermath => aftermath::parse(content, meta, now_ms),
        Venue::FlowxClmm => flowx_clmm::parse(content, meta, now_ms),
        Venue::FlowxAmm => flowx_amm::parse(content, meta, now_ms),
    }
}

/// u64 field that may be JSON-encoded as a number or a decimal string.
pub(crate) fn field_u64(fields: &Value, name: &str) -> Option<u64> {
    let v = fields.get(name)?;
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

/// u128 field; always string-encoded by the node.
pub(crate) fn field_u128(fields: &Value, name: &str) -> Option<u128> {
    let v = fields.get(name)?;
    v.as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| v.as_u64().map(u128::from))
}

/// Signed 32-bit tick stored as an `I32 { bits }` wrapper (two's complement).
pub(crate) fn field_i32_bits(fields: &Value, name: &str) -> Option<i32> {
    let bits = fields.get(name)?.get("fields")?.get("bits")?;
    bits.as_u64()
        .map(|b| (b as u32) as i32)
        .or_else(|| bits.as_i64().map(|b| b as i32))
}

#[cfg(test)]
pub(crate) fn test_meta(venue: Venue) -> PoolMeta {
    PoolMeta {
        pool_id: "0xp00l".to_string(),
        venue,
        coin_a: "0x2::sui::SUI".to_string(),
        coin_b: "0xd::usdc::USDC".to_string(),
    }
}
