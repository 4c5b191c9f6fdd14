use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use metrics::histogram;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    application::content::{ContentError, ContentService},
    cache::{Resource, TierName},
};

#[derive(Debug, Error)]
pub enum CacheWarmError {
    #[error("failed to warm `{key}` in the {tier} tier: {source}")]
    Load {
        key: String,
        tier: TierName,
        #[source]
        source: ContentError,
    },
}

/// Outcome of a warm pass. Failures are reported, never fatal.
#[derive(Debug, Default)]
pub struct WarmReport {
    pub warmed: Vec<String>,
    pub failed: Vec<CacheWarmError>,
}

impl WarmReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CacheWarmer {
    content: Arc<ContentService>,
}

impl CacheWarmer {
    pub fn new(content: Arc<ContentService>) -> Self {
        Self { content }
    }

    /// Read every hot key once through the cache, concurrently.
    pub async fn warm_initial(&self) -> WarmReport {
        info!(target = "bandstand::cache_warmer", "warming content cache");
        let started = Instant::now();

        let loads = Resource::ALL.into_iter().map(|resource| async move {
            let outcome = self.content.load(resource).await;
            (resource, outcome)
        });

        let mut report = WarmReport::default();
        for (resource, outcome) in join_all(loads).await {
            let key = resource.hot_key();
            match outcome {
                Ok(()) => report.warmed.push(key),
                Err(source) => {
                    let error = CacheWarmError::Load {
                        key,
                        tier: resource.tier(),
                        source,
                    };
                    warn!(
                        target = "bandstand::cache_warmer",
                        error = %error,
                        "cache warm step failed"
                    );
                    report.failed.push(error);
                }
            }
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("bandstand_cache_warm_ms").record(elapsed_ms);
        info!(
            target = "bandstand::cache_warmer",
            warmed = report.warmed.len(),
            failed = report.failed.len(),
            elapsed_ms,
            "content cache warmed"
        );

        report
    }
}
