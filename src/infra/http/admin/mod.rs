mod cache;
mod content;
mod health;
mod metrics;
mod state;

pub use state::AdminState;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::middleware::{log_responses, set_request_context};

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/api/events", post(content::create_event))
        .route(
            "/api/events/{id}",
            put(content::update_event).delete(content::delete_event),
        )
        .route("/api/videos", post(content::create_video))
        .route(
            "/api/videos/{id}",
            put(content::update_video).delete(content::delete_video),
        )
        .route("/api/lyrics", post(content::create_lyric))
        .route(
            "/api/lyrics/{id}",
            put(content::update_lyric).delete(content::delete_lyric),
        )
        .route("/api/bio", put(content::save_bio))
        .route("/api/inventory", post(content::create_item))
        .route(
            "/api/inventory/{id}",
            put(content::update_item).delete(content::delete_item),
        )
        .route("/admin/cache/invalidate", post(cache::invalidate_cache))
        .route(
            "/admin/cache/invalidate/{resource}",
            post(cache::invalidate_resource),
        )
        .route("/admin/metrics", get(metrics::admin_metrics))
        .route("/_health/db", get(health::admin_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}
