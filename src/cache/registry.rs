//! Tier registry.
//!
//! Owns the three tiers for the lifetime of the process. Built once at
//! startup and handed to the content service as `Arc<CacheRegistry>`.

use std::sync::Arc;

use super::config::CacheConfig;
use super::tier::{CacheTier, TierName};

/// Values as stored in the tiers: a shared JSON document.
///
/// Callers read and write typed values; encoding happens in the read-through path.
pub type CachedValue = Arc<serde_json::Value>;

pub struct CacheRegistry {
    config: CacheConfig,
    dynamic: CacheTier<CachedValue>,
    semi_static: CacheTier<CachedValue>,
    static_tier: CacheTier<CachedValue>,
}

impl CacheRegistry {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            dynamic: CacheTier::new(TierName::Dynamic, &config.dynamic),
            semi_static: CacheTier::new(TierName::SemiStatic, &config.semi_static),
            static_tier: CacheTier::new(TierName::Static, &config.static_tier),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns false when caching is switched off and reads pass straight through.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn tier(&self, name: TierName) -> &CacheTier<CachedValue> {
        match name {
            TierName::Dynamic => &self.dynamic,
            TierName::SemiStatic => &self.semi_static,
            TierName::Static => &self.static_tier,
        }
    }

    pub fn tiers(&self) -> impl Iterator<Item = &CacheTier<CachedValue>> + '_ {
        TierName::ALL.into_iter().map(|name| self.tier(name))
    }

    /// Whether `key` is live in `tier`. Does not count as a lookup.
    pub fn contains(&self, tier: TierName, key: &str) -> bool {
        self.tier(tier).contains(key)
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    #[test]
    fn tiers_are_independent() {
        let registry = CacheRegistry::default();
        registry
            .tier(TierName::Static)
            .set("bio:main", Arc::new(json!({"body": "hello"})))
            .expect("set");

        assert!(registry.contains(TierName::Static, "bio:main"));
        assert!(!registry.contains(TierName::Dynamic, "bio:main"));
        assert!(!registry.contains(TierName::SemiStatic, "bio:main"));
    }

    #[test]
    fn tiers_take_their_policy_from_config() {
        let config = CacheConfig::default().with_uniform_ttl(Duration::from_secs(5));
        let registry = CacheRegistry::new(config);

        for tier in registry.tiers() {
            assert_eq!(tier.ttl(), Duration::from_secs(5));
        }
        assert_eq!(
            registry.tier(TierName::Static).sweep_interval(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn tiers_iterate_in_declared_order() {
        let registry = CacheRegistry::default();
        let names: Vec<_> = registry.tiers().map(|tier| tier.name()).collect();
        assert_eq!(names, TierName::ALL.to_vec());
    }
}
