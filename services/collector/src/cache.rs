//! Shared pool-state cache.
//!
//! Many collector tasks write, the orchestrator reads. Each key holds one
//! immutable snapshot swapped atomically, so readers never observe a
//! partially written value. Cross-pool coherence is not promised; the
//! scanner's staleness window absorbs per-pool skew.

use dashmap::DashMap;
use kestrel_types::PoolSnapshot;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PoolCache {
    inner: Arc<DashMap<String, PoolSnapshot>>,
}

impl PoolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh a snapshot. A write is accepted only when strictly
    /// newer than the resident snapshot, which keeps per-pool timestamps
    /// monotonic under racing collectors. Returns whether the write landed.
    pub fn upsert(&self, snapshot: PoolSnapshot) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.inner.entry(snapshot.pool_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(snapshot);
                true
            }
            Entry::Occupied(mut slot) => {
                if snapshot.captured_at_ms > slot.get().captured_at_ms {
                    slot.insert(snapshot);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn get(&self, pool_id: &str) -> Option<PoolSnapshot> {
        self.inner.get(pool_id).map(|entry| entry.value().clone())
    }

    /// Clone out every resident snapshot.
    pub fn snapshot(&self) -> Vec<PoolSnapshot> {
        self.inner.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// All pools trading the given pair, in either coin order.
    pub fn pools_for_pair(&self, coin_x: &str, coin_y: &str) -> Vec<PoolSnapshot> {
        self.inner
            .iter()
            .filter(|entry| entry.value().has_pair(coin_x, coin_y))
            .map(|entry| entry.value().clone())
            .collect()
    }
}
