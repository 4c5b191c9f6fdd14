use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::application::error::HttpError;
use crate::cache::Resource;

use super::AdminState;

#[derive(Debug, Serialize)]
struct InvalidationResponse {
    scope: String,
    removed: usize,
}

pub(super) async fn invalidate_cache(State(state): State<AdminState>) -> Response {
    let removed = state.cache.invalidator().all();
    info!(
        target = "bandstand::http::admin::cache",
        removed, "cache flushed by operator"
    );
    Json(InvalidationResponse {
        scope: "all".to_string(),
        removed,
    })
    .into_response()
}

pub(super) async fn invalidate_resource(
    State(state): State<AdminState>,
    Path(resource): Path<String>,
) -> Response {
    let resource = match resource.parse::<Resource>() {
        Ok(resource) => resource,
        Err(err) => {
            return HttpError::from_error(
                "infra::http::admin::cache",
                StatusCode::NOT_FOUND,
                "Unknown resource",
                &err,
            )
            .into_response();
        }
    };

    let removed = state.cache.invalidator().resource(resource);
    info!(
        target = "bandstand::http::admin::cache",
        resource = %resource,
        removed,
        "resource evicted by operator"
    );
    Json(InvalidationResponse {
        scope: resource.to_string(),
        removed,
    })
    .into_response()
}
