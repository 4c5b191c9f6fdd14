//! Cache statistics for the operational metrics endpoint.

use std::collections::BTreeMap;

use serde::Serialize;

use super::registry::CacheRegistry;
use super::tier::TierName;

/// Counters for a single tier at query time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStats {
    /// Live entries currently held.
    pub keys: usize,
    /// Cumulative hits since process start.
    pub hits: u64,
    /// Cumulative misses since process start.
    pub misses: u64,
    /// `hits / (hits + misses)`, or 0 with no traffic.
    pub hit_rate: f64,
}

impl TierStats {
    pub fn new(keys: usize, hits: u64, misses: u64) -> Self {
        Self {
            keys,
            hits,
            misses,
            hit_rate: hit_rate(hits, misses),
        }
    }
}

/// Hit ratio that reports 0 instead of NaN when nothing was looked up.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits.saturating_add(misses);
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Stats for every tier, serialized as `{ "dynamic": {...}, "semiStatic": {...}, "static": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CacheStats {
    tiers: BTreeMap<TierName, TierStats>,
}

impl CacheStats {
    pub fn tier(&self, name: TierName) -> TierStats {
        self.tiers
            .get(&name)
            .copied()
            .unwrap_or_else(|| TierStats::new(0, 0, 0))
    }

    pub fn total_keys(&self) -> usize {
        self.tiers.values().map(|tier| tier.keys).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TierName, TierStats)> + '_ {
        self.tiers.iter().map(|(name, stats)| (*name, *stats))
    }
}

impl CacheRegistry {
    /// Snapshot of every tier. Pure read; counters are left untouched.
    pub fn stats(&self) -> CacheStats {
        let tiers = TierName::ALL
            .into_iter()
            .map(|name| (name, self.tier(name).stats()))
            .collect();
        CacheStats { tiers }
    }
}
