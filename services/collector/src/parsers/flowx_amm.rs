//! FlowX constant-product AMM parser.
//!
//! These pools live as dynamic fields inside the shared `Container`, so the
//! content may arrive wrapped in `dynamic_field::Field { name, value }`.
//! `PairMetadata<X, Y>` carries `reserve_x`, `reserve_y`, `fee_rate` (bps).
//! Observed only; no composition targets this venue.

use super::{field_u64, PoolMeta};
use kestrel_types::PoolSnapshot;
use serde_json::Value;

pub(crate) fn parse(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    let fields = content.get("fields")?;

    // Unwrap the dynamic-field envelope when present.
    let inner = match fields.get("value") {
        Some(value) => value.get("fields").unwrap_or(value),
        None => fields,
    };

    let mut snapshot = meta.blank_snapshot(now_ms);
    snapshot.reserve_a = reserve(inner, "reserve_x");
    snapshot.reserve_b = reserve(inner, "reserve_y");
    snapshot.fee_bps = field_u64(inner, "fee_rate");

    snapshot.reserve_a?;
    snapshot.reserve_b?;
    Some(snapshot)
}

/// Reserves are either bare values or `Balance { fields: { value } }`.
fn reserve(fields: &Value, name: &str) -> Option<u64> {
    if let Some(direct) = field_u64(fields, name) {
        return Some(direct);
    }
    let nested = fields.get(name)?.get("fields")?.get("value")?;
    nested
        .as_u64()
        .or_else(|| nested.as_str().and_then(|s| s.parse().ok()))
}
