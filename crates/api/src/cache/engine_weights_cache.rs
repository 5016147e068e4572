//! Per-user recalibration-weights cache (spec.md §4.8, SPEC_FULL §6).
//!
//! Recalibration reads the last few TLX entries and nudges three weights;
//! concurrent requests for the same user must not race each other into
//! inconsistent weights, while requests for different users must never
//! block on each other. `DashMap` gives sharded per-key locking for the
//! map itself; the `RwLock` inside each entry serializes read-then-nudge
//! access to one user's weights.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use cogscheduler_domain::UpdatedWeights;

#[derive(Debug, Clone, Default)]
pub struct EngineWeightsCache {
    entries: Arc<DashMap<Uuid, Arc<RwLock<UpdatedWeights>>>>,
}

impl EngineWeightsCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// The lock guarding `user_id`'s weights, seeded with `default` on first
    /// access.
    pub fn entry(&self, user_id: Uuid, default: UpdatedWeights) -> Arc<RwLock<UpdatedWeights>> {
        self.entries
            .entry(user_id)
            .or_insert_with(|| Arc::new(RwLock::new(default)))
            .clone()
    }

    pub fn invalidate(&self, user_id: Uuid) {
        self.entries.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(v: f64) -> UpdatedWeights {
        UpdatedWeights {
            fatigue_consec_weight: v,
            fatigue_total_weight: v,
            fatigue_force_break: v,
        }
    }

    #[tokio::test]
    async fn entry_seeds_once_then_returns_the_same_lock() {
        let cache = EngineWeightsCache::new();
        let user_id = Uuid::new_v4();

        let first = cache.entry(user_id, weights(0.4));
        {
            let mut guard = first.write().await;
            guard.fatigue_consec_weight = 0.5;
        }

        let second = cache.entry(user_id, weights(0.9));
        assert_eq!(second.read().await.fatigue_consec_weight, 0.5);
    }

    #[tokio::test]
    async fn different_users_get_independent_entries() {
        let cache = EngineWeightsCache::new();
        let a = cache.entry(Uuid::new_v4(), weights(0.4));
        let b = cache.entry(Uuid::new_v4(), weights(0.6));
        assert_eq!(a.read().await.fatigue_consec_weight, 0.4);
        assert_eq!(b.read().await.fatigue_consec_weight, 0.6);
    }
}
