//! Token decimal metadata for cross-venue price normalization.
//!
//! Raw pool prices are quoted in each token's smallest unit. SUI carries 9
//! decimals, the bridged stables 6, wrapped ETH/BTC 8, so a raw SUI/USDC
//! ratio is off by 10³ from the human price, and comparing a CLMM sqrt-price
//! quote against an AMM reserve ratio without correcting for the gap
//! manufactures spreads that do not exist.

use std::collections::HashMap;

/// Maps a fully qualified coin type to its decimal count.
///
/// Seeded with the Sui-mainnet defaults; unknown tokens fall back to 9
/// (the SUI standard). Deployments can override or extend via [`Self::set`].
#[derive(Debug, Clone)]
pub struct DecimalsMap {
    overrides: HashMap<String, u8>,
}

impl DecimalsMap {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Register an explicit decimal count for a coin type.
    pub fn set(&mut self, coin_type: impl Into<String>, decimals: u8) {
        self.overrides.insert(coin_type.into(), decimals);
    }

    /// Decimal count for a coin type.
    pub fn decimals_of(&self, coin_type: &str) -> u8 {
        if let Some(&d) = self.overrides.get(coin_type) {
            return d;
        }
        builtin_decimals(coin_type)
    }

    /// Multiplier that converts a raw A-in-B price into a real-world price:
    /// `10^(dec_a - dec_b)`.
    pub fn adjustment_factor(&self, coin_a: &str, coin_b: &str) -> f64 {
        let diff = self.decimals_of(coin_a) as i32 - self.decimals_of(coin_b) as i32;
        10f64.powi(diff)
    }

    /// Normalize a raw pool price into real-world terms.
    pub fn normalize_price(&self, raw: f64, coin_a: &str, coin_b: &str) -> f64 {
        raw * self.adjustment_factor(coin_a, coin_b)
    }
}

impl Default for DecimalsMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Known mainnet decimal counts, keyed by the last path segment of the coin
/// type (`0x2::sui::SUI` → `SUI`).
fn builtin_decimals(coin_type: &str) -> u8 {
    let symbol = coin_type
        .rsplit("::")
        .next()
        .unwrap_or(coin_type)
        .to_ascii_uppercase();

    match symbol.as_str() {
        "SUI" => 9,
        "USDC" | "USDT" | "DEEP" => 6,
        "WETH" | "ETH" | "WBTC" | "BTC" => 8,
        "CETUS" | "TURBOS" | "NAVX" | "SCA" => 9,
        "HASUI" | "AFSUI" | "VSUI" => 9,
        // Bridged tokens surface as a generic `coin::COIN`; the publishing
        // package distinguishes them.
        "COIN" => {
            if coin_type.contains("af8cd5edc19c4512") {
                8 // wETH
            } else if coin_type.contains("c060006111016b8a") {
                6 // wUSDT
            } else {
                9
            }
        }
        _ => 9,
    }
}
