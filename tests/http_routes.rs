mod support;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bandstand::application::content::ContentService;
use bandstand::cache::{CacheConfig, Resource, TierName};
use bandstand::infra::http::{
    AdminState, HttpState, RequestContext, build_admin_router, build_router,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use support::{MemoryRepo, service_with};

struct Harness {
    repo: Arc<MemoryRepo>,
    content: Arc<ContentService>,
    public: Router,
    admin: Router,
}

fn harness() -> Harness {
    let repo = MemoryRepo::new();
    let content = Arc::new(service_with(repo.clone(), CacheConfig::default()));
    let public = build_router(HttpState {
        content: content.clone(),
        health: repo.clone(),
    });
    let admin = build_admin_router(AdminState {
        content: content.clone(),
        cache: content.cache().clone(),
        health: repo.clone(),
        started_at: Instant::now(),
    });
    Harness {
        repo,
        content,
        public,
        admin,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request should build");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be json")
    };
    (status, value)
}

#[tokio::test]
async fn public_listing_is_served_from_cache_after_first_read() {
    let h = harness();
    h.repo.seed_event("Oslo");

    let (status, body) = send(&h.public, Method::GET, "/api/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["city"], "Oslo");

    let (status, _) = send(&h.public, Method::GET, "/api/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.repo.reads(Resource::Events), 1);
}

#[tokio::test]
async fn empty_bio_is_null() {
    let h = harness();
    let (status, body) = send(&h.public, Method::GET, "/api/bio", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn repository_failure_surfaces_as_server_error() {
    let h = harness();
    h.repo.fail_reads_of(Resource::Videos);

    let (status, _) = send(&h.public, Method::GET, "/api/videos", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!h.content.cache().contains(TierName::Static, "videos:all"));
}

#[tokio::test]
async fn health_reports_database_state() {
    let h = harness();
    let (status, _) = send(&h.public, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    h.repo.set_database_down(true);
    let (status, _) = send(&h.public, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn admin_write_evicts_the_public_listing() {
    let h = harness();
    let (_, body) = send(&h.public, Method::GET, "/api/events", None).await;
    assert_eq!(body, json!([]));

    let (status, created) = send(
        &h.admin,
        Method::POST,
        "/api/events",
        Some(json!({
            "title": "Live in Bergen",
            "venue": "USF Verftet",
            "city": "Bergen",
            "starts_at": "2026-11-20T20:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["city"], "Bergen");
    assert!(!h.content.cache().contains(TierName::SemiStatic, "events:all"));

    let (_, body) = send(&h.public, Method::GET, "/api/events", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(h.repo.reads(Resource::Events), 2);
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() {
    let h = harness();
    let item = json!({ "sku": "TEE-BLK-M", "name": "Tour tee", "price_cents": 2500, "quantity": 10 });

    let (status, _) = send(&h.admin, Method::POST, "/api/inventory", Some(item.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&h.admin, Method::POST, "/api/inventory", Some(item)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn operator_invalidation_endpoints() {
    let h = harness();
    send(&h.public, Method::GET, "/api/inventory", None).await;
    send(&h.public, Method::GET, "/api/lyrics", None).await;

    let (status, body) = send(&h.admin, Method::POST, "/admin/cache/invalidate/inventory", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "scope": "inventory", "removed": 1 }));
    assert!(h.content.cache().contains(TierName::Static, "lyrics:all"));

    let (status, _) = send(&h.admin, Method::POST, "/admin/cache/invalidate/merch", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&h.admin, Method::POST, "/admin/cache/invalidate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "scope": "all", "removed": 1 }));
    assert_eq!(h.content.cache().stats().total_keys(), 0);
}

#[tokio::test]
async fn metrics_endpoint_reports_cache_and_database() {
    let h = harness();
    send(&h.public, Method::GET, "/api/inventory", None).await;
    send(&h.public, Method::GET, "/api/inventory", None).await;

    let (status, body) = send(&h.admin, Method::GET, "/admin/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache"]["dynamic"]["hits"], 1);
    assert_eq!(body["cache"]["dynamic"]["misses"], 1);
    assert_eq!(body["cache"]["dynamic"]["hitRate"], 0.5);
    assert_eq!(body["cache"]["static"]["hitRate"], 0.0);
    assert_eq!(body["database"]["ok"], true);
    assert!(body["uptimeSeconds"].is_u64());

    // Reading metrics does not count as a lookup.
    let (_, again) = send(&h.admin, Method::GET, "/admin/metrics", None).await;
    assert_eq!(again["cache"]["dynamic"]["hits"], 1);
}

#[tokio::test]
async fn responses_are_tagged_with_request_scope() {
    let h = harness();
    for (router, uri, scope) in [
        (&h.public, "/api/lyrics", "lyrics"),
        (&h.public, "/health", "health"),
        (&h.admin, "/admin/metrics", "metrics"),
    ] {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");

        let ctx = response
            .extensions()
            .get::<RequestContext>()
            .expect("request context attached");
        assert_eq!(ctx.scope, scope, "{uri}");
        assert!(!ctx.request_id.is_empty());
    }
}
