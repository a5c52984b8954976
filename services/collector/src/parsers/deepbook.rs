//! DeepBook CLOB pool parser.
//!
//! A CLOB prices through its book, not its vaults: vault balances are
//! resting-order inventory and bear no relation to the market price, so they
//! are captured only as depth context. Best bid/ask arrive from the order
//! book summary when the node exposes it; without them the snapshot carries
//! no price and the scanner ignores the pool rather than inventing a spread.

use super::{field_u64, PoolMeta};
use kestrel_types::PoolSnapshot;
use serde_json::Value;

pub(crate) fn parse(content: &Value, meta: &PoolMeta, now_ms: u64) -> Option<PoolSnapshot> {
    let fields = content.get("fields")?;

    let mut snapshot = meta.blank_snapshot(now_ms);
    snapshot.reserve_a = vault_balance(fields, "base_vault");
    snapshot.reserve_b = vault_balance(fields, "quote_vault");

    // Book summary, when present (level-2 enabled nodes).
    if let Some(book) = fields.get("book").and_then(|b| b.get("fields")) {
        snapshot.best_bid = price_f64(book, "best_bid");
        snapshot.best_ask = price_f64(book, "best_ask");
        snapshot.bid_depth = field_u64(book, "bid_depth");
        snapshot.ask_depth = field_u64(book, "ask_depth");
    }

    Some(snapshot)
}

/// Vault balances nest as `vault.fields.balance`, string or number encoded.
fn vault_balance(fields: &Value, vault: &str) -> Option<u64> {
    let b = fields.get(vault)?.get("fields")?.get("balance")?;
    b.as_u64().or_else(|| b.as_str().and_then(|s| s.parse().ok()))
}

fn price_f64(fields: &Value, name: &str) -> Option<f64> {
    let v = fields.get(name)?;
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        .filter(|p| p.is_finite() && *p > 0.0)
}
