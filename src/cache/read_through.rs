//! Read-through access.
//!
//! Every content read goes through [`CacheRegistry::get_or_fetch`]. A hit
//! returns the stored value without touching the repository; a miss runs the
//! fetch and stores its result. Cache-layer faults never surface: an entry
//! that no longer decodes is evicted and the read proceeds as a miss, and a
//! value that cannot be stored is returned uncached.
//!
//! Concurrent misses on the same key each run their own fetch and the last
//! store wins.

use std::future::Future;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::CacheError;
use super::registry::CacheRegistry;
use super::tier::TierName;
use super::{METRIC_CACHE_FALLBACK, METRIC_CACHE_HIT, METRIC_CACHE_MISS};

impl CacheRegistry {
    /// Return the cached value for `key` in `tier`, or fetch, store and return it.
    ///
    /// Only an error from `fetch` itself is returned to the caller.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        tier: TierName,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.is_enabled() {
            return fetch().await;
        }

        let store = self.tier(tier);

        if let Some(cached) = store.get(key) {
            match T::deserialize(cached.as_ref()) {
                Ok(value) => {
                    store.record_hit();
                    counter!(METRIC_CACHE_HIT, "tier" => tier.as_str()).increment(1);
                    return Ok(value);
                }
                Err(source) => {
                    // Unreadable entries are dropped and the read continues as a miss.
                    store.delete(key);
                    let error = CacheError::Decode {
                        key: key.to_string(),
                        source,
                    };
                    report_fallback(tier, key, &error);
                }
            }
        }

        store.record_miss();
        counter!(METRIC_CACHE_MISS, "tier" => tier.as_str()).increment(1);

        let value = fetch().await?;

        let stored = serde_json::to_value(&value)
            .map_err(|source| CacheError::Encode {
                key: key.to_string(),
                source,
            })
            .and_then(|document| store.set(key, Arc::new(document)));
        if let Err(error) = stored {
            report_fallback(tier, key, &error);
        }

        Ok(value)
    }
}

fn report_fallback(tier: TierName, key: &str, error: &CacheError) {
    warn!(
        target = "bandstand::cache",
        tier = %tier,
        key,
        fault = error.kind(),
        error = %error,
        "Cache layer fault, falling back to fetch"
    );
    counter!(
        METRIC_CACHE_FALLBACK,
        "tier" => tier.as_str(),
        "fault" => error.kind()
    )
    .increment(1);
}
