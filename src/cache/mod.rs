//! Bandstand Cache System
//!
//! A read-through cache between the content service and Postgres, split into
//! three expiring tiers:
//!
//! - **dynamic** (5 min): inventory, which changes with every sale
//! - **semiStatic** (15 min): tour dates
//! - **static** (60 min): videos, lyrics and the band bio
//!
//! Reads go through [`CacheRegistry::get_or_fetch`]; writes evict by resource
//! name through [`Invalidator`]. Background sweeps purge expired entries.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! warm_on_startup = true
//!
//! [cache.dynamic]
//! ttl_seconds = 300
//! sweep_interval_seconds = 60
//! ```

mod config;
mod error;
mod invalidation;
mod keys;
mod lock;
mod read_through;
mod registry;
mod stats;
mod sweeper;
mod tier;

pub use config::{CacheConfig, TierConfig};
pub use error::CacheError;
pub use invalidation::Invalidator;
pub use keys::{KeyParam, Resource, UnknownResource, cache_key};
pub use registry::{CacheRegistry, CachedValue};
pub use stats::{CacheStats, TierStats, hit_rate};
pub use sweeper::CacheSweeper;
pub use tier::{CacheTier, TierName};

pub(crate) const METRIC_CACHE_HIT: &str = "bandstand_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "bandstand_cache_miss_total";
pub(crate) const METRIC_CACHE_FALLBACK: &str = "bandstand_cache_fallback_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "bandstand_cache_evict_total";
