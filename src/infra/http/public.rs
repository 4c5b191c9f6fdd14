use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::content::ContentService;
use crate::application::repos::HealthRepo;

use super::content_error_to_http;
use super::db_health_response;
use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub content: Arc<ContentService>,
    pub health: Arc<dyn HealthRepo>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/videos", get(list_videos))
        .route("/api/lyrics", get(list_lyrics))
        .route("/api/bio", get(bio))
        .route("/api/inventory", get(inventory))
        .route("/health", get(public_health))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_responses))
        .layer(axum::middleware::from_fn(set_request_context))
}

const SOURCE: &str = "infra::http::public";

async fn list_events(State(state): State<HttpState>) -> Response {
    match state.content.list_events().await {
        Ok(events) => Json(events).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

async fn list_videos(State(state): State<HttpState>) -> Response {
    match state.content.list_videos().await {
        Ok(videos) => Json(videos).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

async fn list_lyrics(State(state): State<HttpState>) -> Response {
    match state.content.list_lyrics().await {
        Ok(lyrics) => Json(lyrics).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

/// Responds with `null` until a biography has been written.
async fn bio(State(state): State<HttpState>) -> Response {
    match state.content.bio().await {
        Ok(bio) => Json(bio).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

async fn inventory(State(state): State<HttpState>) -> Response {
    match state.content.inventory().await {
        Ok(inventory) => Json(inventory).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}
