//! Cache configuration.
//!
//! Controls the three tiers via the `[cache]` section of `bandstand.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use super::tier::TierName;

// Default values for cache configuration
const DEFAULT_DYNAMIC_TTL_SECS: u64 = 5 * 60;
const DEFAULT_DYNAMIC_SWEEP_SECS: u64 = 60;
const DEFAULT_SEMI_STATIC_TTL_SECS: u64 = 15 * 60;
const DEFAULT_SEMI_STATIC_SWEEP_SECS: u64 = 120;
const DEFAULT_STATIC_TTL_SECS: u64 = 60 * 60;
const DEFAULT_STATIC_SWEEP_SECS: u64 = 300;

/// Shortest sweep period a tier runs with; `tokio::time::interval` rejects zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Expiry policy shared by every entry of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    /// Maximum age of an entry before it is treated as absent.
    pub ttl: Duration,
    /// How often the background sweep purges expired entries.
    pub sweep_interval: Duration,
    /// Optional ceiling on resident entries; `None` means unbounded.
    pub max_entries: Option<NonZeroUsize>,
}

impl TierConfig {
    /// A `sweep_interval` below [`MIN_SWEEP_INTERVAL`] is raised to it.
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            ttl,
            sweep_interval: sweep_interval.max(MIN_SWEEP_INTERVAL),
            max_entries: None,
        }
    }

    /// Built-in policy for a tier.
    pub fn default_for(tier: TierName) -> Self {
        let (ttl, sweep) = match tier {
            TierName::Dynamic => (DEFAULT_DYNAMIC_TTL_SECS, DEFAULT_DYNAMIC_SWEEP_SECS),
            TierName::SemiStatic => (DEFAULT_SEMI_STATIC_TTL_SECS, DEFAULT_SEMI_STATIC_SWEEP_SECS),
            TierName::Static => (DEFAULT_STATIC_TTL_SECS, DEFAULT_STATIC_SWEEP_SECS),
        };
        Self::new(Duration::from_secs(ttl), Duration::from_secs(sweep))
    }

    pub fn with_max_entries(mut self, limit: usize) -> Self {
        self.max_entries = NonZeroUsize::new(limit);
        self
    }
}

/// Runtime cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When false, every read goes straight to the repositories.
    pub enabled: bool,
    /// Pre-populate the hot keys once the database is reachable.
    pub warm_on_startup: bool,
    pub dynamic: TierConfig,
    pub semi_static: TierConfig,
    pub static_tier: TierConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warm_on_startup: true,
            dynamic: TierConfig::default_for(TierName::Dynamic),
            semi_static: TierConfig::default_for(TierName::SemiStatic),
            static_tier: TierConfig::default_for(TierName::Static),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            warm_on_startup: settings.warm_on_startup,
            dynamic: settings.dynamic,
            semi_static: settings.semi_static,
            static_tier: settings.static_tier,
        }
    }
}

impl CacheConfig {
    /// Policy for the given tier.
    pub fn tier(&self, tier: TierName) -> TierConfig {
        match tier {
            TierName::Dynamic => self.dynamic,
            TierName::SemiStatic => self.semi_static,
            TierName::Static => self.static_tier,
        }
    }

    /// Returns a copy with every tier using the same TTL. Handy in tests.
    pub fn with_uniform_ttl(mut self, ttl: Duration) -> Self {
        self.dynamic.ttl = ttl;
        self.semi_static.ttl = ttl;
        self.static_tier.ttl = ttl;
        self
    }
}
