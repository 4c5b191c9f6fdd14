use std::time::Instant;

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::cache::CacheStats;

use super::AdminState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MetricsResponse {
    cache: CacheStats,
    uptime_seconds: u64,
    database: DatabaseStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseStatus {
    ok: bool,
    latency_ms: f64,
}

/// Operational snapshot. Reading it never moves the cache counters.
pub(super) async fn admin_metrics(State(state): State<AdminState>) -> Json<MetricsResponse> {
    let started = Instant::now();
    let ping = state.health.ping().await;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    if let Err(err) = &ping {
        warn!(
            target = "bandstand::http::admin::metrics",
            error = %err,
            "database ping failed"
        );
    }

    Json(MetricsResponse {
        cache: state.cache.stats(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: DatabaseStatus {
            ok: ping.is_ok(),
            latency_ms,
        },
    })
}
