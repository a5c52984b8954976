//! Cetus CLMM pool parser.
//!
//! `Pool<A, B>` carries `current_sqrt_price: u128`, `liquidity: u128`,
//! `current_tick_index: I32`, and `fee_rate: u64` in 1e6 units
//! (2500 = 0.25%).

use super::{field_i32_bits, field_u128, field_u64, PoolMeta};
use kestrel_types::PoolSnapshot;
use serde_json::Value;

pub(crate) fn parse(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    let fields = content.get("fields")?;

    let mut snapshot = meta.blank_snapshot(now_ms);
    snapshot.sqrt_price = field_u128(fields, "current_sqrt_price");
    snapshot.liquidity = field_u128(fields, "liquidity");
    snapshot.tick_index = field_i32_bits(fields, "current_tick_index");
    snapshot.fee_bps = field_u64(fields, "fee_rate").map(|f| f / 100);

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
                "current_sqrt_price": "18446744073709551616",
                "liquidity": "999999999999",
                "current_tick_index": {"fields": {"bits": 4294967290u64}},
                "fee_rate": "2500",
            }
        });
        let snap = parse(&content, &test_meta(Venue::Cetus), 1_000).unwrap();
        assert_eq!(snap.sqrt_price, Some(1u128 << 64));
        assert_eq!(snap.liquidity, Some(999_999_999_999));
        assert_eq!(snap.tick_index, Some(-6));
        assert_eq!(snap.fee_bps, Some(25));
        assert_eq!(snap.captured_at_ms, 1_000);
    }

    #[test]
    fn missing_price_drops_snapshot() {
        let content = json!({"fields": {"liquidity": "1"}});
        assert!(parse(&content, &test_meta(Venue::Cetus), 0).is_none());
        assert!(parse(&json!({}), &test_meta(Venue::Cetus), 0).is_none());
    }

    #[test]
    fn null_fields_tolerated() {
        let content = json!({
            "fields": {
                "current_sqrt_price": "18446744073709551616",
                "liquidity": null,
                "current_tick_index": null,
                "fee_rate": null,
            }
        });
        let snap = parse(&content, &test_meta(Venue::Cetus), 0).unwrap();
        assert!(snap.liquidity.is_none());
        assert!(snap.fee_bps.is_none());
    }
}
