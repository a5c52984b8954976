//! Aftermath weighted-pool parser.
//!
//! `normalized_balances` and `weights` are 18-decimal fixed-point strings
//! far beyond u64, so they are read as f64 and folded into synthetic
//! reserves that preserve the price ratio at a fixed virtual depth. The
//! swap fee arrives 18-decimal fixed-point as well
//! (2500000000000000 = 0.25% = 25 bps).

use super::PoolMeta;
use kestrel_types::PoolSnapshot;
use serde_json::Value;

/// Virtual depth the synthetic reserves are scaled to; only the ratio
/// matters for pricing.
const VIRTUAL_DEPTH: u64 = 1_000_000_000;

pub(crate) fn parse(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    let fields = content.get("fields")?;

    let norm_a = fixed_point_at(fields, "normalized_balances", 0)?;
    let norm_b = fixed_point_at(fields, "normalized_balances", 1)?;
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return None;
    }

    let mut snapshot = meta.blank_snapshot(now_ms);
    let price = norm_b / norm_a;
    snapshot.reserve_a = Some(VIRTUAL_DEPTH);
    snapshot.reserve_b = Some(((VIRTUAL_DEPTH as f64 * price) as u64).max(1));

    // Advertised weights, normalized to sum 1; absent weights mean balanced.
    if let (Some(wa), Some(wb)) = (
        fixed_point_at(fields, "weights", 0),
        fixed_point_at(fields, "weights", 1),
    ) {
        let sum = wa + wb;
        if sum > 0.0 {
            snapshot.weight_a = Some(wa / sum);
            snapshot.weight_b = Some(wb / sum);
        }
    }

    snapshot.fee_bps = fields
        .get("fees_swap_in")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|f| f.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .map(|fee| (fee / 1e18 * 10_000.0) as u64);

    Some(snapshot)
}

/// Array element at `index`, parsed from an 18-decimal fixed-point string.
fn fixed_point_at(fields: &Value, name: &str, index: usize) -> Option<f64> {
    fields
        .get(name)?
        .as_array()?
        .get(index)?
        .as_str()?
        .parse()
        .ok()
}
