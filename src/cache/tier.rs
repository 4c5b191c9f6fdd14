//! Expiring key-value tiers.
//!
//! Every entry in a tier shares the tier's TTL. Expired entries are treated as
//! absent on read and removed lazily; the sweeper purges the rest.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use super::config::{MIN_SWEEP_INTERVAL, TierConfig};
use super::error::CacheError;
use super::lock::{rw_read, rw_write};
use super::stats::TierStats;

const SOURCE: &str = "cache::tier";

/// Identifies one of the three cache tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TierName {
    #[serde(rename = "dynamic")]
    Dynamic,
    #[serde(rename = "semiStatic")]
    SemiStatic,
    #[serde(rename = "static")]
    Static,
}

impl TierName {
    pub const ALL: [TierName; 3] = [TierName::Dynamic, TierName::SemiStatic, TierName::Static];

    pub fn as_str(self) -> &'static str {
        match self {
            TierName::Dynamic => "dynamic",
            TierName::SemiStatic => "semiStatic",
            TierName::Static => "static",
        }
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

/// A named map of entries that expire after the tier's TTL.
pub struct CacheTier<V> {
    name: TierName,
    ttl: Duration,
    sweep_interval: Duration,
    max_entries: Option<NonZeroUsize>,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> CacheTier<V> {
    pub fn new(name: TierName, config: &TierConfig) -> Self {
        Self {
            name,
            ttl: config.ttl,
            sweep_interval: config.sweep_interval.max(MIN_SWEEP_INTERVAL),
            max_entries: config.max_entries,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> TierName {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Look up a live entry.
    ///
    /// Returns `None` for both missing and expired keys; an expired entry is
    /// removed on the way out. Does not touch the hit/miss counters.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = rw_read(&self.entries, SOURCE, "get");
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now, self.ttl) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = rw_write(&self.entries, SOURCE, "get.expire");
        if entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now, self.ttl))
        {
            entries.remove(key);
        }
        None
    }

    /// Store a value under `key` with the tier's TTL, replacing any previous entry.
    ///
    /// Fails only when the tier is bounded and full of live entries.
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<(), CacheError> {
        let key = key.into();
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "set");

        if let Some(limit) = self.max_entries
            && entries.len() >= limit.get()
            && !entries.contains_key(&key)
        {
            let ttl = self.ttl;
            entries.retain(|_, entry| !entry.is_expired(now, ttl));
            if entries.len() >= limit.get() {
                return Err(CacheError::Capacity {
                    tier: self.name,
                    limit: limit.get(),
                });
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
        Ok(())
    }

    /// Remove a key. Returns true if an entry was resident.
    pub fn delete(&self, key: &str) -> bool {
        rw_write(&self.entries, SOURCE, "delete")
            .remove(key)
            .is_some()
    }

    /// Whether a live entry exists, without counting a hit or miss.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        rw_read(&self.entries, SOURCE, "contains")
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now, self.ttl))
    }

    /// Keys of all live entries.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        rw_read(&self.entries, SOURCE, "keys")
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        rw_read(&self.entries, SOURCE, "len")
            .values()
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Returns how many were resident.
    pub fn flush(&self) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "flush");
        let count = entries.len();
        entries.clear();
        count
    }

    /// Remove expired entries. Returns how many were purged.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut entries = rw_write(&self.entries, SOURCE, "purge_expired");
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - entries.len()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Point-in-time counters for this tier.
    pub fn stats(&self) -> TierStats {
        TierStats::new(self.len(), self.hits(), self.misses())
    }

    /// Entries held in memory, including expired ones not yet purged.
    #[cfg(test)]
    pub(crate) fn resident_len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "resident_len").len()
    }
}
