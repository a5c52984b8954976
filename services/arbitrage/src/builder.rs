//! Transaction construction for the 27 published entries.
//!
//! Every entry shares the `(admin cap, pause flag, …venue groups…, amount,
//! min_profit, clock)` layout; what varies is the venue group each leg
//! contributes: a Cetus leg brings the global config, a Turbos leg its
//! versioned object, a DeepBook leg the DEEP fee coin, an Aftermath leg its
//! five protocol objects. The leg table below is the single authority for
//! which venue owns which pool handle, in entry-parameter order.

use anyhow::{Context, Result};
use kestrel_rpc::RpcClient;
use kestrel_types::{Config, Opportunity, StrategyTag, Venue};
use serde_json::{json, Value};
use tracing::debug;

/// The shared clock object.
const CLOCK_OBJECT: &str = "0x6";

/// On-chain minimum-profit floor: 90% of the expected profit, never below 1
/// so the profit assertion cannot degenerate into a no-op. The 10% give
/// absorbs drift between build and execution.
pub fn min_profit_floor(expected_profit: u64) -> u64 {
    (expected_profit / 10 * 9).max(1)
}

pub struct TxBuilder {
    rpc: RpcClient,
    sender: String,
    package_id: String,
    admin_cap_id: String,
    pause_flag_id: String,
    gas_budget: u64,
    cetus_global_config: String,
    turbos_versioned: String,
    flowx_versioned: String,
    aftermath_registry: String,
    aftermath_fee_vault: String,
    aftermath_treasury: String,
    aftermath_insurance: String,
    aftermath_referral: String,
    deep_fee_coin_id: String,
}

impl TxBuilder {
    pub fn new(config: &Config, rpc: RpcClient, sender: &str) -> Self {
        Self {
            rpc,
            sender: sender.to_string(),
            package_id: config.package_id.clone(),
            admin_cap_id: config.admin_cap_id.clone(),
            pause_flag_id: config.pause_flag_id.clone(),
            gas_budget: config.max_gas_budget,
            cetus_global_config: config.cetus_global_config.clone(),
            turbos_versioned: config.turbos_versioned.clone(),
            flowx_versioned: config.flowx_versioned.clone(),
            aftermath_registry: config.aftermath_registry.clone(),
            aftermath_fee_vault: config.aftermath_fee_vault.clone(),
            aftermath_treasury: config.aftermath_treasury.clone(),
            aftermath_insurance: config.aftermath_insurance.clone(),
            aftermath_referral: config.aftermath_referral.clone(),
            deep_fee_coin_id: config.deep_fee_coin_id.clone(),
        }
    }

    /// Build the unsigned transaction for a candidate; returns base64 tx
    /// bytes ready for dry-run or signing.
    pub async fn build(&self, opp: &Opportunity) -> Result<String> {
        let args = self.call_args(opp)?;
        let module = opp.tag.module();
        let function = opp.tag.entry_function();

        debug!(
            module,
            function,
            amount = opp.amount_in,
            min_profit = min_profit_floor(opp.expected_profit),
            "building transaction"
        );

        let result = self
            .rpc
            .call(
                "unsafe_moveCall",
                json!([
                    self.sender,
                    self.package_id,
                    module,
                    function,
                    opp.type_args,
                    args,
                    null, // gas object auto-selected
                    self.gas_budget.to_string(),
                ]),
            )
            .await?;

        result
            .get("txBytes")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .context("moveCall response missing txBytes")
    }

    /// Assemble the value-argument list in entry-parameter order.
    fn call_args(&self, opp: &Opportunity) -> Result<Vec<Value>> {
        anyhow::ensure!(
            opp.pool_ids.len() >= opp.tag.pool_count(),
            "{:?} needs {} pool handles, candidate carries {}",
            opp.tag,
            opp.tag.pool_count(),
            opp.pool_ids.len()
        );
        if opp.tag.touches_deepbook() {
            anyhow::ensure!(
                !self.deep_fee_coin_id.is_empty(),
                "{:?} requires DEEP_FEE_COIN_ID",
                opp.tag
            );
        }

        let mut args = vec![json!(self.admin_cap_id), json!(self.pause_flag_id)];
        for (leg, venue) in leg_venues(opp.tag).iter().enumerate() {
            self.push_venue_group(&mut args, *venue, &opp.pool_ids[leg]);
        }
        args.push(json!(opp.amount_in.to_string()));
        args.push(json!(min_profit_floor(opp.expected_profit).to_string()));
        args.push(json!(CLOCK_OBJECT));
        Ok(args)
    }

    fn push_venue_group(&self, args: &mut Vec<Value>, venue: Venue, pool_id: &str) {
        match venue {
            Venue::Cetus => {
                args.push(json!(self.cetus_global_config));
                args.push(json!(pool_id));
            }
            Venue::Turbos => {
                args.push(json!(pool_id));
                args.push(json!(self.turbos_versioned));
            }
            Venue::DeepBook => {
                args.push(json!(pool_id));
                args.push(json!(self.deep_fee_coin_id));
            }
            Venue::FlowxClmm => {
                args.push(json!(pool_id));
                args.push(json!(self.flowx_versioned));
            }
            Venue::Aftermath => {
                args.push(json!(pool_id));
                args.push(json!(self.aftermath_registry));
                args.push(json!(self.aftermath_fee_vault));
                args.push(json!(self.aftermath_treasury));
                args.push(json!(self.aftermath_insurance));
                args.push(json!(self.aftermath_referral));
            }
            Venue::FlowxAmm => {
                // No published composition; leg_venues never yields this.
                args.push(json!(pool_id));
            }
        }
    }
}

/// Venue owning each pool handle, in entry-parameter order. Must stay in
/// lock-step with the published entry signatures.
fn leg_venues(tag: StrategyTag) -> &'static [Venue] {
    use StrategyTag::*;
    use Venue::*;

    match tag {
        CetusToTurbos | CetusToTurbosRev => &[Cetus, Turbos],
        TurbosToCetus => &[Turbos, Cetus],
        CetusToDeepBook => &[Cetus, DeepBook],
        DeepBookToCetus => &[DeepBook, Cetus],
        TurbosToDeepBook => &[Turbos, DeepBook],
        DeepBookToTurbos => &[DeepBook, Turbos],
        CetusToAftermath | CetusToAftermathRev => &[Cetus, Aftermath],
        TurbosToAftermath => &[Turbos, Aftermath],
        DeepBookToAftermath => &[DeepBook, Aftermath],
        CetusToFlowxClmm => &[Cetus, FlowxClmm],
        FlowxClmmToCetus => &[FlowxClmm, Cetus],
        TurbosToFlowxClmm => &[Turbos, FlowxClmm],
        FlowxClmmToTurbos => &[FlowxClmm, Turbos],
        DeepBookToFlowxClmm => &[DeepBook, FlowxClmm],
        FlowxClmmToDeepBook => &[FlowxClmm, DeepBook],
        TriCetusCetusCetus => &[Cetus, Cetus, Cetus],
        TriCetusCetusTurbos => &[Cetus, Cetus, Turbos],
        TriCetusTurbosDeepBook => &[Cetus, Turbos, DeepBook],
        TriCetusDeepBookTurbos => &[Cetus, DeepBook, Turbos],
        TriDeepBookCetusTurbos => &[DeepBook, Cetus, Turbos],
        TriCetusCetusAftermath => &[Cetus, Cetus, Aftermath],
        TriCetusTurbosAftermath => &[Cetus, Turbos, Aftermath],
        TriCetusCetusFlowxClmm => &[Cetus, Cetus, FlowxClmm],
        TriCetusFlowxClmmTurbos => &[Cetus, FlowxClmm, Turbos],
        TriFlowxClmmCetusTurbos => &[FlowxClmm, Cetus, Turbos],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_types::PoolConfig;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            rpc_url: "http://localhost:9000".into(),
            ws_url: None,
            private_key_hex: String::new(),
            package_id: "0xpkg".into(),
            admin_cap_id: "0xcap".into(),
            pause_flag_id: "0xflag".into(),
            cetus_global_config: "0xcetuscfg".into(),
            turbos_versioned: "0xturbosver".into(),
            flowx_versioned: "0xflowxver".into(),
            aftermath_registry: "0xaftreg".into(),
            aftermath_fee_vault: "0xaftfee".into(),
            aftermath_treasury: "0xafttre".into(),
            aftermath_insurance: "0xaftins".into(),
            aftermath_referral: "0xaftref".into(),
            deep_fee_coin_id: "0xdeepfee".into(),
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

    fn builder() -> TxBuilder {
        let config = test_config();
        let rpc = RpcClient::new(&config.rpc_url, Duration::from_secs(1)).unwrap();
        TxBuilder::new(&config, rpc, "0xsender")
    }

    fn candidate(tag: StrategyTag, pools: &[&str]) -> Opportunity {
        Opportunity {
            tag,
            pool_ids: pools.iter().map(|s| s.to_string()).collect(),
            type_args: vec!["0x2::sui::SUI".into(), "0xd::usdc::USDC".into()],
            amount_in: 1_000_000_000,
            expected_profit: 10_000_000,
            estimated_gas: 5_000_000,
            net_profit: 5_000_000,
            detected_at_ms: 0,
        }
    }

    #[test]
    fn min_profit_floor_behavior() {
        assert_eq!(min_profit_floor(10_000_000), 9_000_000);
        assert_eq!(min_profit_floor(0), 1, "floor never degenerates to zero");
        assert_eq!(min_profit_floor(5), 1); // 5/10*9 = 0 → floored
        // No overflow near u64::MAX.
        assert_eq!(min_profit_floor(u64::MAX), u64::MAX / 10 * 9);
    }

    #[test]
    fn two_hop_layout_prefix_and_tail() {
        let args = builder()
            .call_args(&candidate(StrategyTag::CetusToTurbos, &["0xcpool", "0xtpool"]))
            .unwrap();
        let expect: Vec<Value> = vec![
            json!("0xcap"),
            json!("0xflag"),
            json!("0xcetuscfg"),
            json!("0xcpool"),
            json!("0xtpool"),
            json!("0xturbosver"),
            json!("1000000000"),
            json!("9000000"),
            json!("0x6"),
        ];
        assert_eq!(args, expect);
    }

    #[test]
    fn deepbook_source_carries_fee_coin() {
        let args = builder()
            .call_args(&candidate(StrategyTag::DeepBookToCetus, &["0xbook", "0xcpool"]))
            .unwrap();
        assert_eq!(args[2], json!("0xbook"));
        assert_eq!(args[3], json!("0xdeepfee"));
        assert_eq!(args[4], json!("0xcetuscfg"));
        assert_eq!(args[5], json!("0xcpool"));
    }

    #[test]
    fn aftermath_sink_brings_five_protocol_objects() {
        let args = builder()
            .call_args(&candidate(StrategyTag::CetusToAftermath, &["0xcpool", "0xapool"]))
            .unwrap();
        // prefix(2) + cetus(2) + aftermath(6) + tail(3)
        assert_eq!(args.len(), 13);
        assert_eq!(args[4], json!("0xapool"));
        assert_eq!(args[5], json!("0xaftreg"));
        assert_eq!(args[9], json!("0xaftref"));
    }

    #[test]
    fn tri_layouts_cover_three_pools() {
        let args = builder()
            .call_args(&candidate(
                StrategyTag::TriDeepBookCetusTurbos,
                &["0xbook", "0xab", "0xbc"],
            ))
            .unwrap();
        // prefix(2) + deepbook(2) + cetus(2) + turbos(2) + tail(3)
        assert_eq!(args.len(), 11);
        assert_eq!(args[2], json!("0xbook"));
        assert_eq!(args[3], json!("0xdeepfee"));
        assert_eq!(args[10], json!("0x6"));
    }

    #[test]
    fn missing_pool_handles_rejected() {
        let err = builder()
            .call_args(&candidate(StrategyTag::TriCetusCetusCetus, &["0xab", "0xbc"]))
            .unwrap_err();
        assert!(err.to_string().contains("3 pool handles"));
    }

    #[test]
    fn deepbook_without_fee_coin_rejected() {
        let config = Config {
            deep_fee_coin_id: String::new(),
            ..test_config()
        };
        let rpc = RpcClient::new(&config.rpc_url, Duration::from_secs(1)).unwrap();
        let no_fee = TxBuilder::new(&config, rpc, "0xsender");
        assert!(no_fee
            .call_args(&candidate(StrategyTag::CetusToDeepBook, &["0xc", "0xb"]))
            .is_err());
    }

    #[test]
    fn every_tag_has_a_leg_table_consistent_with_its_pool_count() {
        for tag in StrategyTag::ALL {
            assert_eq!(
                leg_venues(tag).len(),
                tag.pool_count(),
                "leg table out of step for {tag:?}"
            );
            assert_eq!(leg_venues(tag)[0], tag.flash_source(), "{tag:?}");
        }
    }
}
