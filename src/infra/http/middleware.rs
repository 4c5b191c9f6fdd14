//! Request tagging and response logging shared by the public and admin routers.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;
use crate::cache::Resource;

/// Per-request tags, inserted into request and response extensions.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    /// Content resource or operational surface the path addresses.
    pub scope: &'static str,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
        scope: request_scope(request.uri().path()),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Map a request path to the resource it reads or writes.
///
/// `/api/events/{id}` is `events`, `/admin/cache/invalidate/bio` is `cache`.
pub fn request_scope(path: &str) -> &'static str {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("api"), Some(resource)) => resource
            .parse::<Resource>()
            .map(Resource::prefix)
            .unwrap_or("api"),
        (Some("admin"), Some("cache")) => "cache",
        (Some("admin"), Some("metrics")) => "metrics",
        (Some("health" | "_health"), _) => "health",
        _ => "unscoped",
    }
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let ctx = request.extensions().get::<RequestContext>().cloned();
    let (request_id, scope) = match &ctx {
        Some(ctx) => (ctx.request_id.as_str(), ctx.scope),
        None => ("", request_scope(&path)),
    };

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    if !(status.is_client_error() || status.is_server_error()) {
        debug!(
            target = "bandstand::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            scope,
            elapsed_ms,
            request_id,
            "request served",
        );
        return response;
    }

    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");

    if status.is_server_error() {
        error!(
            target = "bandstand::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            scope,
            elapsed_ms,
            source,
            detail,
            chain = ?messages,
            request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "bandstand::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            scope,
            elapsed_ms,
            source,
            detail,
            chain = ?messages,
            request_id,
            "client request error",
        );
    }

    response
}
