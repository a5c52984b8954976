//! Batched RPC poller.
//!
//! One `sui_multiGetObjects` call per interval covers every monitored pool;
//! a single round trip instead of N, which is what keeps the poller inside
//! public-node rate limits. DeepBook V3 pools hide their state behind a
//! `Versioned` wrapper and cost one follow-up dynamic-field fetch; Turbos
//! pools carry their fee tier in the object type string, lifted here because
//! the entry calls need it as a type argument.

use crate::cache::PoolCache;
use crate::now_ms;
use crate::parsers::{self, PoolMeta};
use crate::supervisor::{CollectorTask, Heartbeat};
use anyhow::{Context, Result};
use async_trait::async_trait;
use kestrel_rpc::RpcClient;
use kestrel_types::{Config, Venue};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct RpcPoller {
    rpc: RpcClient,
    interval: Duration,
    pools: Vec<PoolMeta>,
}

impl RpcPoller {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            rpc: RpcClient::new(&config.rpc_url, Duration::from_secs(5))?,
            interval: Duration::from_millis(config.poll_interval_ms.max(100)),
            pools: pool_metas(config),
        })
    }

    /// Blocking initial fill so the first scan tick has data to work with.
    pub async fn seed(&self, cache: &PoolCache) -> Result<usize> {
        let updated = self.poll_once(cache).await?;
        info!(pools = updated, "pool cache seeded");
        Ok(updated)
    }

    /// One batched fetch-and-parse cycle. Returns how many snapshots landed.
    async fn poll_once(&self, cache: &PoolCache) -> Result<usize> {
        if self.pools.is_empty() {
            return Ok(0);
        }
        let ids: Vec<&str> = self.pools.iter().map(|m| m.pool_id.as_str()).collect();
        let result = self
            .rpc
            .call(
                "sui_multiGetObjects",
                json!([ids, {"showContent": true, "showType": true}]),
            )
            .await?;

        let objects = result.as_array().context("multiGetObjects: not an array")?;
        let ts = now_ms();
        let mut updated = 0usize;

        for (meta, object) in self.pools.iter().zip(objects) {
            if let Some(err) = object.get("error") {
                warn!(pool = %meta.pool_id, venue = %meta.venue, error = %err, "object fetch error");
                continue;
            }
            let Some(data) = object.get("data") else { continue };
            let Some(raw_content) = data.get("content") else { continue };

            let content = if meta.venue == Venue::DeepBook && is_versioned(raw_content) {
                match self.unwrap_versioned(raw_content).await {
                    Ok(inner) => inner,
                    Err(e) => {
                        warn!(pool = %meta.pool_id, error = %e, "versioned unwrap failed");
                        continue;
                    }
                }
            } else {
                raw_content.clone()
            };

            match parsers::parse_snapshot(&content, meta, ts) {
                Some(mut snapshot) => {
                    if meta.venue == Venue::Turbos {
                        snapshot.extra_type_arg = data
                            .get("type")
                            .and_then(|t| t.as_str())
                            .and_then(third_type_param);
                    }
                    if cache.upsert(snapshot) {
                        updated += 1;
                    }
                }
                None => {
                    warn!(pool = %meta.pool_id, venue = %meta.venue, "snapshot dropped (parse)");
                }
            }
        }

        Ok(updated)
    }

    /// DeepBook V3: the outer pool wraps a `Versioned` object whose live
    /// state sits in the dynamic field keyed `1u64`.
    async fn unwrap_versioned(&self, content: &Value) -> Result<Value> {
        let inner_id = content
            .get("fields")
            .and_then(|f| f.get("inner"))
            .and_then(|i| i.get("fields"))
            .and_then(|f| f.get("id"))
            .and_then(|id| id.get("id"))
            .and_then(|id| id.as_str())
            .context("versioned pool missing inner object id")?;

        let result = self
            .rpc
            .call(
                "suix_getDynamicFieldObject",
                json!([inner_id, {"type": "u64", "value": "1"}]),
            )
            .await?;

        if let Some(err) = result.get("error") {
            anyhow::bail!("dynamic field error: {err}");
        }

        result
            .get("data")
            .and_then(|d| d.get("content"))
            .and_then(|c| c.get("fields"))
            .and_then(|f| f.get("value"))
            .cloned()
            .context("versioned pool missing dynamic field value")
    }
}

#[async_trait]
impl CollectorTask for RpcPoller {
    fn name(&self) -> &str {
        "rpc-poller"
    }

    async fn run(&self, cache: PoolCache, heartbeat: Heartbeat) -> Result<()> {
        info!(
            pools = self.pools.len(),
            interval_ms = self.interval.as_millis() as u64,
            "rpc poller started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.poll_once(&cache).await {
                Ok(updated) => {
                    if updated > 0 {
                        heartbeat.beat(now_ms());
                    }
                    debug!(updated, total = self.pools.len(), "poll cycle");
                }
                Err(e) => {
                    // One failed batch is not fatal; the next interval
                    // retries. Persistent transport failure bubbles up to
                    // the supervisor via the heartbeat going stale.
                    warn!(error = %e, "batch poll failed");
                }
            }
        }
    }
}

/// Monitored-pool metadata from config, dropping entries whose venue is
/// unknown (already warned about at validation).
pub fn pool_metas(config: &Config) -> Vec<PoolMeta> {
    config
        .monitored_pools
        .iter()
        .filter_map(|p| {
            let venue = Venue::from_config_name(&p.venue)?;
            Some(PoolMeta {
                pool_id: p.pool_id.clone(),
                venue,
                coin_a: p.coin_type_a.clone(),
                coin_b: p.coin_type_b.clone(),
            })
        })
        .collect()
}

/// DeepBook V3 detection: an `inner` field but no directly visible vault.
fn is_versioned(content: &Value) -> bool {
    content
        .get("fields")
        .map(|f| f.get("inner").is_some() && f.get("base_vault").is_none())
        .unwrap_or(false)
}

/// Third type parameter of a Move type string:
/// `…::pool::Pool<A, B, …::fee3000bps::FEE3000BPS>` → the fee tier.
/// Splitting on `, ` is sound for these non-nested parameter lists.
fn third_type_param(type_str: &str) -> Option<String> {
    let open = type_str.find('<')?;
    let close = type_str.rfind('>')?;
    let params: Vec<&str> = type_str[open + 1..close].split(", ").collect();
    params.get(2).map(|s| s.to_string())
}
