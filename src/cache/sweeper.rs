//! Background expiry sweeps.
//!
//! One task per tier wakes on the tier's sweep interval and purges expired
//! entries, so keys nobody reads again do not stay resident.

use std::sync::Arc;

use metrics::counter;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::METRIC_CACHE_EVICT;
use super::registry::CacheRegistry;
use super::tier::TierName;

pub struct CacheSweeper {
    handles: Vec<JoinHandle<()>>,
}

impl CacheSweeper {
    /// Start one sweep task per tier on the current runtime.
    pub fn spawn(registry: Arc<CacheRegistry>) -> Self {
        let handles = TierName::ALL
            .into_iter()
            .map(|name| tokio::spawn(sweep_tier(Arc::clone(&registry), name)))
            .collect();
        Self { handles }
    }

    /// Stop every sweep task and wait for them to wind down.
    pub async fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles {
            let _ = handle.await;
        }
        info!(target = "bandstand::cache", "Cache sweeper stopped");
    }
}

async fn sweep_tier(registry: Arc<CacheRegistry>, name: TierName) {
    let period = registry.tier(name).sweep_interval();
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let purged = registry.tier(name).purge_expired();
        if purged > 0 {
            counter!(
                METRIC_CACHE_EVICT,
                "tier" => name.as_str(),
                "reason" => "expired"
            )
            .increment(purged as u64);
            debug!(
                target = "bandstand::cache",
                tier = %name,
                purged,
                "Swept expired cache entries"
            );
        }
    }
}
