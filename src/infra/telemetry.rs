use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "bandstand_cache_hit_total",
            Unit::Count,
            "Reads served from a cache tier."
        );
        describe_counter!(
            "bandstand_cache_miss_total",
            Unit::Count,
            "Reads that fell through to the repositories."
        );
        describe_counter!(
            "bandstand_cache_fallback_total",
            Unit::Count,
            "Reads served uncached because the cache layer faulted."
        );
        describe_counter!(
            "bandstand_cache_evict_total",
            Unit::Count,
            "Entries removed by invalidation, flush or expiry sweep."
        );
        describe_histogram!(
            "bandstand_cache_warm_ms",
            Unit::Milliseconds,
            "Startup cache warm latency in milliseconds."
        );
    });
}
