//! Runtime configuration, loaded from environment variables.
//!
//! Call `dotenvy::dotenv().ok()` before [`Config::from_env`]. Validation is a
//! separate pass so startup can report every problem at once, distinguishing
//! hard blockers (missing package handles) from degradations (a venue's
//! shared object left unset disables only that venue's strategies).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ── Network ──
    pub rpc_url: String,
    /// WebSocket endpoint; derived from `rpc_url` when unset.
    pub ws_url: Option<String>,

    // ── Wallet ──
    pub private_key_hex: String,

    // ── Deployed package handles ──
    pub package_id: String,
    pub admin_cap_id: String,
    pub pause_flag_id: String,

    // ── Venue shared objects ──
    pub cetus_global_config: String,
    pub turbos_versioned: String,
    pub flowx_versioned: String,
    pub aftermath_registry: String,
    pub aftermath_fee_vault: String,
    pub aftermath_treasury: String,
    pub aftermath_insurance: String,
    pub aftermath_referral: String,
    /// Owned `Coin<DEEP>` object used to pay DeepBook taker fees.
    pub deep_fee_coin_id: String,

    // ── Monitoring ──
    pub monitored_pools: Vec<PoolConfig>,

    // ── Strategy loop ──
    /// Minimum acceptable profit, in the input asset's smallest unit.
    pub min_profit: u64,
    pub poll_interval_ms: u64,
    pub max_gas_budget: u64,
    pub dry_run_before_submit: bool,
    pub use_websocket: bool,
    pub ws_mode: String,

    // ── Circuit breaker & gas monitor ──
    pub cb_max_consecutive_failures: u32,
    pub cb_max_cumulative_loss: i64,
    pub cb_cooldown_ms: u64,
    /// Minimum wallet balance (MIST) required to keep submitting.
    pub min_gas_balance: u64,
}

/// One monitored pool: `venue:pool_id:coin_type_a:coin_type_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub venue: String,
    pub pool_id: String,
    pub coin_type_a: String,
    pub coin_type_b: String,
}

/// Outcome of [`Config::validate`]: blockers stop the bot, warnings degrade
/// specific strategies.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let monitored_pools = std::env::var("MONITORED_POOLS")
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|entry| PoolConfig::parse(entry.trim()))
            .collect();

        Ok(Config {
            rpc_url: required("RPC_URL")?,
            ws_url: std::env::var("WS_URL").ok().filter(|s| !s.is_empty()),
            private_key_hex: required("PRIVATE_KEY")?,
            package_id: required("PACKAGE_ID")?,
            admin_cap_id: required("ADMIN_CAP_ID")?,
            pause_flag_id: required("PAUSE_FLAG_ID")?,
            cetus_global_config: optional("CETUS_GLOBAL_CONFIG"),
            turbos_versioned: optional("TURBOS_VERSIONED"),
            flowx_versioned: optional("FLOWX_VERSIONED"),
            aftermath_registry: optional("AFTERMATH_REGISTRY"),
            aftermath_fee_vault: optional("AFTERMATH_FEE_VAULT"),
            aftermath_treasury: optional("AFTERMATH_TREASURY"),
            aftermath_insurance: optional("AFTERMATH_INSURANCE"),
            aftermath_referral: optional("AFTERMATH_REFERRAL"),
            deep_fee_coin_id: optional("DEEP_FEE_COIN_ID"),
            monitored_pools,
            min_profit: parsed("MIN_PROFIT", 1_000_000)?,
            poll_interval_ms: parsed("POLL_INTERVAL_MS", 500)?,
            max_gas_budget: parsed("MAX_GAS_BUDGET", 50_000_000)?,
            dry_run_before_submit: parsed("DRY_RUN_BEFORE_SUBMIT", true)?,
            use_websocket: parsed("USE_WEBSOCKET", false)?,
            ws_mode: std::env::var("WS_MODE").unwrap_or_else(|_| "event".to_string()),
            cb_max_consecutive_failures: parsed("CB_MAX_CONSECUTIVE_FAILURES", 5)?,
            cb_max_cumulative_loss: parsed("CB_MAX_CUMULATIVE_LOSS", 1_000_000_000)?,
            cb_cooldown_ms: parsed("CB_COOLDOWN_MS", 60_000)?,
            min_gas_balance: parsed("MIN_GAS_BALANCE", 100_000_000)?,
        })
    }

    /// The WebSocket endpoint, derived from the RPC endpoint when not
    /// explicitly configured.
    pub fn effective_ws_url(&self) -> String {
        self.ws_url.clone().unwrap_or_else(|| {
            self.rpc_url
                .replacen("https://", "wss://", 1)
                .replacen("http://", "ws://", 1)
        })
    }

    /// Check the configuration for blockers and degradations.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if Url::parse(&self.rpc_url).is_err() {
            report.errors.push(format!("RPC_URL is not a valid URL: {}", self.rpc_url));
        }
        for (name, value) in [
            ("PACKAGE_ID", &self.package_id),
            ("ADMIN_CAP_ID", &self.admin_cap_id),
            ("PAUSE_FLAG_ID", &self.pause_flag_id),
        ] {
            if is_placeholder(value) {
                report
                    .errors
                    .push(format!("{name} is unset or a placeholder ({value})"));
            }
        }

        if self.monitored_pools.is_empty() {
            report
                .errors
                .push("MONITORED_POOLS is empty - nothing to monitor".to_string());
        }
        for (i, pool) in self.monitored_pools.iter().enumerate() {
            if crate::pool::Venue::from_config_name(&pool.venue).is_none() {
                report
                    .warnings
                    .push(format!("pool #{i}: unknown venue {:?}", pool.venue));
            }
            if !pool.pool_id.starts_with("0x") {
                report
                    .warnings
                    .push(format!("pool #{i}: pool id {:?} is not 0x-prefixed", pool.pool_id));
            }
        }

        let uses_deepbook = self
            .monitored_pools
            .iter()
            .any(|p| p.venue.eq_ignore_ascii_case("deepbook"));
        if uses_deepbook && is_placeholder(&self.deep_fee_coin_id) {
            report.warnings.push(
                "DeepBook pools configured but DEEP_FEE_COIN_ID is unset - \
                 DeepBook strategies will abort"
                    .to_string(),
            );
        }
        if is_placeholder(&self.cetus_global_config) {
            report
                .warnings
                .push("CETUS_GLOBAL_CONFIG unset - Cetus strategies disabled".to_string());
        }
        if is_placeholder(&self.turbos_versioned) {
            report
                .warnings
                .push("TURBOS_VERSIONED unset - Turbos strategies disabled".to_string());
        }

        if self.min_profit == 0 {
            report
                .warnings
                .push("MIN_PROFIT is 0 - the bot will chase dust-sized spreads".to_string());
        }
        if self.max_gas_budget < 10_000_000 {
            report.warnings.push(format!(
                "MAX_GAS_BUDGET {} is very low - strategies may run out of gas",
                self.max_gas_budget
            ));
        }

        report
    }
}

impl PoolConfig {
    /// Parse one `venue:pool_id:coin_type_a:coin_type_b` entry.
    ///
    /// Coin types contain `::` path separators, so the string cannot be
    /// split on every colon. The venue and pool id are taken up to the first
    /// two colons; the two coin types are then separated at `:0x`, which is
    /// unambiguous because Move module paths are never hex-prefixed.
    pub fn parse(entry: &str) -> Option<PoolConfig> {
        let (venue, rest) = entry.split_once(':')?;
        let (pool_id, coins) = rest.split_once(':')?;
        let boundary = coins.find(":0x")?;
        let coin_type_a = &coins[..boundary];
        let coin_type_b = &coins[boundary + 1..];

        if venue.is_empty() || pool_id.is_empty() || coin_type_a.is_empty() || coin_type_b.is_empty()
        {
            return None;
        }

        Some(PoolConfig {
            venue: venue.to_string(),
            pool_id: pool_id.to_string(),
            coin_type_a: coin_type_a.to_string(),
            coin_type_b: coin_type_b.to_string(),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing environment variable {name}"))
}

fn optional(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}

fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value == "0x0" || value == "0x..."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Config {
        Config {
            rpc_url: "https://fullnode.mainnet.sui.io:443".into(),
            ws_url: None,
            private_key_hex: "0x00".into(),
            package_id: "0xabc".into(),
            admin_cap_id: "0xdef".into(),
            pause_flag_id: "0x123".into(),
            cetus_global_config: "0xc0".into(),
            turbos_versioned: "0xt0".into(),
            flowx_versioned: String::new(),
            aftermath_registry: String::new(),
            aftermath_fee_vault: String::new(),
            aftermath_treasury: String::new(),
            aftermath_insurance: String::new(),
            aftermath_referral: String::new(),
            deep_fee_coin_id: String::new(),
            monitored_pools: vec![PoolConfig {
                venue: "cetus".into(),
                pool_id: "0x1".into(),
                coin_type_a: "0x2::sui::SUI".into(),
                coin_type_b: "0xd::usdc::USDC".into(),
            }],
            min_profit: 1_000_000,
            poll_interval_ms: 500,
            max_gas_budget: 50_000_000,
            dry_run_before_submit: true,
            use_websocket: false,
            ws_mode: "event".into(),
            cb_max_consecutive_failures: 5,
            cb_max_cumulative_loss: 1_000_000_000,
            cb_cooldown_ms: 60_000,
            min_gas_balance: 100_000_000,
        }
    }

    #[test]
    fn parse_full_pool_entry() {
        let entry = "cetus:0xcf99:0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI:0xdba34672::usdc::USDC";
        let pc = PoolConfig::parse(entry).expect("valid entry");
        assert_eq!(pc.venue, "cetus");
        assert_eq!(pc.pool_id, "0xcf99");
        assert_eq!(
            pc.coin_type_a,
            "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI"
        );
        assert_eq!(pc.coin_type_b, "0xdba34672::usdc::USDC");
    }

    #[test]
    fn parse_reversed_pair_ordering() {
        let entry = "turbos:0xbca4:0xdeeb::deep::DEEP:0x2::sui::SUI";
        let pc = PoolConfig::parse(entry).expect("valid entry");
        assert_eq!(pc.coin_type_a, "0xdeeb::deep::DEEP");
        assert_eq!(pc.coin_type_b, "0x2::sui::SUI");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(PoolConfig::parse("").is_none());
        assert!(PoolConfig::parse("cetus").is_none());
        assert!(PoolConfig::parse("cetus:0x1").is_none());
        assert!(PoolConfig::parse("cetus:0x1:only_one_type").is_none());
    }

    #[test]
    fn validate_clean_config() {
        let report = minimal().validate();
        assert!(!report.is_fatal(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn validate_flags_placeholder_handles() {
        let mut cfg = minimal();
        cfg.package_id = "0x...".into();
        cfg.pause_flag_id = String::new();
        let report = cfg.validate();
        assert!(report.is_fatal());
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn validate_warns_on_deepbook_without_fee_coin() {
        let mut cfg = minimal();
        cfg.monitored_pools.push(PoolConfig {
            venue: "deepbook".into(),
            pool_id: "0x9".into(),
            coin_type_a: "0x2::sui::SUI".into(),
            coin_type_b: "0xd::usdc::USDC".into(),
        });
        let report = cfg.validate();
        assert!(!report.is_fatal());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("DEEP_FEE_COIN_ID")));
    }

    #[test]
    fn ws_url_derivation() {
        let mut cfg = minimal();
        assert_eq!(
            cfg.effective_ws_url(),
            "wss://fullnode.mainnet.sui.io:443"
        );
        cfg.ws_url = Some("wss://stream.example.org".into());
        assert_eq!(cfg.effective_ws_url(), "wss://stream.example.org");
    }

    #[test]
    fn config_serde_round_trip() {
        let cfg = minimal();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.monitored_pools, cfg.monitored_pools);
        assert_eq!(back.min_profit, cfg.min_profit);
    }
}
