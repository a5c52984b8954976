//! Turbos CLMM pool parser.
//!
//! `Pool<A, B, Fee>` carries `sqrt_price`, `liquidity`,
//! `tick_current_index: I32`, and `fee` in 1e6 units. The fee-tier type
//! parameter is not in the content; the poller lifts it off the object type
//! string after parsing.

use super::{field_i32_bits, field_u128, field_u64, PoolMeta};
use kestrel_types::PoolSnapshot;
use serde_json::Value;

pub(crate) fn parse(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    let fields = content.get("fields")?;

    let mut snapshot = meta.blank_snapshot(now_ms);
    snapshot.sqrt_price = field_u128(fields, "sqrt_price");
    snapshot.liquidity = field_u128(fields, "liquidity");
    snapshot.tick_index = field_i32_bits(fields, "tick_current_index");
    snapshot.fee_bps = field_u64(fields, "fee").map(|f| f / 100);

    snapshot.sqrt_price?;
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::super::test_meta;
    use super::*;
    use kestrel_types::Venue;
    use serde_json::json;

    #[test]
    fn full_object_parses() {
        let content = json!({
            "fields": {
                "sqrt_price": "26087635650665564424",
                "liquidity": "5000000000",
                "tick_current_index": {"fields": {"bits": 100}},
                "fee": 3000,
            }
        });
        let snap = parse(&content, &test_meta(Venue::Turbos), 7).unwrap();
        assert_eq!(snap.sqrt_price, Some(26_087_635_650_665_564_424));
        assert_eq!(snap.tick_index, Some(100));
        assert_eq!(snap.fee_bps, Some(30));
    }

    #[test]
    fn missing_price_drops_snapshot() {
        assert!(parse(&json!({"fields": {}}), &test_meta(Venue::Turbos), 0).is_none());
    }
}
