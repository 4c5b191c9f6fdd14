mod support;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bandstand::cache::{CacheConfig, CacheRegistry, TierConfig, TierName};
use bandstand::infra::cache_warmer::CacheWarmer;
use metrics_util::debugging::DebuggingRecorder;
use serde_json::json;

use support::{MemoryRepo, service_with};

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    // Miss then hit on the dynamic tier.
    let registry = CacheRegistry::default();
    for _ in 0..2 {
        let _: Vec<u32> = registry
            .get_or_fetch("inventory:all", TierName::Dynamic, || async {
                Ok::<_, std::io::Error>(vec![1, 2, 3])
            })
            .await
            .expect("read");
    }

    // Decode fault on a corrupt entry.
    registry
        .tier(TierName::Static)
        .set("bio:main", Arc::new(json!(42)))
        .expect("seed");
    let _: Option<String> = registry
        .get_or_fetch("bio:main", TierName::Static, || async {
            Ok::<_, std::io::Error>(None)
        })
        .await
        .expect("fallback read");

    // Pattern invalidation and a full flush.
    registry.invalidator().inventory();
    registry.invalidator().all();

    // Capacity fault on a one-slot tier.
    let mut tight = CacheConfig::default();
    tight.dynamic =
        TierConfig::new(Duration::from_secs(300), Duration::from_secs(60)).with_max_entries(1);
    let tight = CacheRegistry::new(tight);
    for key in ["inventory:all", "inventory:sku:1"] {
        let _: u32 = tight
            .get_or_fetch(key, TierName::Dynamic, || async {
                Ok::<_, std::io::Error>(7)
            })
            .await
            .expect("read");
    }

    // Startup warm-up.
    let service = Arc::new(service_with(MemoryRepo::new(), CacheConfig::default()));
    let report = CacheWarmer::new(service).warm_initial().await;
    assert!(report.is_complete());

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "bandstand_cache_hit_total",
        "bandstand_cache_miss_total",
        "bandstand_cache_fallback_total",
        "bandstand_cache_evict_total",
        "bandstand_cache_warm_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
