//! # Kestrel Collector - Pool-State Ingestion
//!
//! ## Purpose
//!
//! Keeps the shared pool cache fresh: a batched RPC poller covering every
//! monitored pool each interval, an optional WebSocket event stream for
//! finality-latency updates, tolerant per-venue parsers, and a supervisor
//! that restarts failed collectors with jittered backoff while publishing
//! liveness heartbeats the orchestrator gates on.
//!
//! ## Integration Points
//!
//! - **Input**: node JSON-RPC + WebSocket endpoints, monitored-pool config
//! - **Output**: [`PoolCache`] of timestamped [`kestrel_types::PoolSnapshot`]s
//!   (strictly-newer writes only), [`Heartbeats`] liveness registry
//! - **Failure policy**: parse failures drop one snapshot; transport
//!   failures end the run and the supervisor restarts it

pub mod cache;
pub mod parsers;
pub mod poller;
pub mod stream;
pub mod supervisor;

pub use cache::PoolCache;
pub use parsers::PoolMeta;
pub use poller::{pool_metas, RpcPoller};
pub use stream::{EventStream, VenuePackage};
pub use supervisor::{supervise, Backoff, CollectorTask, Heartbeat, Heartbeats};

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
