//! FlowX CLMM pool parser. Cetus-shaped, with its own field names:
//! `sqrt_price`, `tick_index: I32`, `liquidity`, `swap_fee_rate` (1e6 units).

use super::{field_i32_bits, field_u128, field_u64, PoolMeta};
use kestrel_types::PoolSnapshot;
use serde_json::Value;

pub(crate) fn parse(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    let fields = content.get("fields")?;

    let mut snapshot = meta.blank_snapshot(now_ms);
    snapshot.sqrt_price = field_u128(fields, "sqrt_price");
    snapshot.liquidity = field_u128(fields, "liquidity");
    snapshot.tick_index = field_i32_bits(fields, "tick_index");
    snapshot.fee_bps = field_u64(fields, "swap_fee_rate").map(|f| f / 100);

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
                "sqrt_price": "18446744073709551616",
                "liquidity": "123456789",
                "tick_index": {"fields": {"bits": 0}},
                "swap_fee_rate": "10000",
            }
        });
        let snap = parse(&content, &test_meta(Venue::FlowxClmm), 0).unwrap();
        assert_eq!(snap.fee_bps, Some(100));
        assert_eq!(snap.tick_index, Some(0));
    }

    #[test]
    fn garbage_tolerated() {
        let content = json!({"fields": {"sqrt_price": "not a number"}});
        assert!(parse(&content, &test_meta(Venue::FlowxClmm), 0).is_none());
    }
}
