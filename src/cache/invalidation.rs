//! Invalidation by pattern and by resource.
//!
//! A pattern matches every key that contains it as a substring, in any tier.
//! Resource prefixes are disjoint (see `keys.rs`), so invalidating one
//! resource leaves the others intact.

use metrics::counter;
use tracing::debug;

use super::METRIC_CACHE_EVICT;
use super::keys::Resource;
use super::registry::CacheRegistry;

impl CacheRegistry {
    /// Delete every key, in every tier, that contains `pattern`.
    ///
    /// Returns the number of keys removed. Other keys are left untouched.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let mut removed = 0;
        for tier in self.tiers() {
            let mut tier_removed = 0;
            for key in tier.keys() {
                if key.contains(pattern) && tier.delete(&key) {
                    tier_removed += 1;
                }
            }
            if tier_removed > 0 {
                counter!(
                    METRIC_CACHE_EVICT,
                    "tier" => tier.name().as_str(),
                    "reason" => "invalidate"
                )
                .increment(tier_removed as u64);
            }
            removed += tier_removed;
        }

        debug!(
            target = "bandstand::cache",
            pattern,
            removed,
            "Invalidated cache entries"
        );
        removed
    }

    /// Flush all three tiers. Returns the number of entries dropped.
    pub fn invalidate_all(&self) -> usize {
        let mut removed = 0;
        for tier in self.tiers() {
            let flushed = tier.flush();
            if flushed > 0 {
                counter!(
                    METRIC_CACHE_EVICT,
                    "tier" => tier.name().as_str(),
                    "reason" => "flush"
                )
                .increment(flushed as u64);
            }
            removed += flushed;
        }
        debug!(target = "bandstand::cache", removed, "Flushed every cache tier");
        removed
    }

    pub fn invalidator(&self) -> Invalidator<'_> {
        Invalidator { registry: self }
    }
}

/// Per-resource invalidation entry points, called after successful writes.
#[derive(Clone, Copy)]
pub struct Invalidator<'a> {
    registry: &'a CacheRegistry,
}

impl Invalidator<'_> {
    pub fn events(&self) -> usize {
        self.resource(Resource::Events)
    }

    pub fn videos(&self) -> usize {
        self.resource(Resource::Videos)
    }

    pub fn lyrics(&self) -> usize {
        self.resource(Resource::Lyrics)
    }

    pub fn bio(&self) -> usize {
        self.resource(Resource::Bio)
    }

    pub fn inventory(&self) -> usize {
        self.resource(Resource::Inventory)
    }

    pub fn resource(&self, resource: Resource) -> usize {
        self.registry.invalidate(resource.prefix())
    }

    pub fn all(&self) -> usize {
        self.registry.invalidate_all()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::cache::tier::TierName;

    fn seeded() -> CacheRegistry {
        let registry = CacheRegistry::default();
        for resource in Resource::ALL {
            registry
                .tier(resource.tier())
                .set(resource.hot_key(), Arc::new(json!([])))
                .expect("seed hot key");
        }
        registry
            .tier(TierName::SemiStatic)
            .set("events:city:Oslo", Arc::new(json!([])))
            .expect("seed");
        registry
    }

    #[test]
    fn pattern_removes_only_matching_keys() {
        let registry = seeded();

        let removed = registry.invalidate("events");

        assert_eq!(removed, 2);
        assert!(!registry.contains(TierName::SemiStatic, "events:all"));
        assert!(!registry.contains(TierName::SemiStatic, "events:city:Oslo"));
        assert!(registry.contains(TierName::Static, "videos:all"));
        assert!(registry.contains(TierName::Static, "bio:main"));
        assert!(registry.contains(TierName::Dynamic, "inventory:all"));
    }

    #[test]
    fn pattern_spans_every_tier() {
        let registry = CacheRegistry::default();
        for tier in TierName::ALL {
            registry
                .tier(tier)
                .set("shared:key", Arc::new(json!(1)))
                .expect("seed");
        }

        assert_eq!(registry.invalidate("shared"), 3);
        for tier in TierName::ALL {
            assert!(!registry.contains(tier, "shared:key"));
        }
    }

    #[test]
    fn unmatched_pattern_is_a_no_op() {
        let registry = seeded();
        let before = registry.stats().total_keys();

        assert_eq!(registry.invalidate("merch"), 0);
        assert_eq!(registry.stats().total_keys(), before);
    }

    #[test]
    fn each_resource_invalidator_is_isolated() {
        for target in Resource::ALL {
            let registry = seeded();
            registry.invalidator().resource(target);

            for other in Resource::ALL {
                let present = registry.contains(other.tier(), &other.hot_key());
                assert_eq!(present, other != target, "{target} invalidation vs {other}");
            }
        }
    }

    #[test]
    fn named_invalidators_match_resources() {
        let registry = seeded();
        let invalidator = registry.invalidator();

        assert_eq!(invalidator.inventory(), 1);
        assert_eq!(invalidator.bio(), 1);
        assert_eq!(invalidator.videos(), 1);
        assert_eq!(invalidator.lyrics(), 1);
        assert_eq!(invalidator.events(), 2);
        assert_eq!(registry.stats().total_keys(), 0);
    }

    #[test]
    fn invalidate_all_flushes_every_tier() {
        let registry = seeded();
        assert_eq!(registry.invalidator().all(), 6);
        for tier in registry.tiers() {
            assert!(tier.is_empty());
        }
    }
}
