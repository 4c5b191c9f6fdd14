//! Write endpoints for site content.
//!
//! Each handler delegates to the content service, which evicts the affected
//! resource from the cache once the write has been persisted.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateEventParams, CreateInventoryParams, CreateLyricParams, CreateVideoParams,
    UpdateEventParams, UpdateInventoryParams, UpdateLyricParams, UpdateVideoParams,
};

use super::super::content_error_to_http;
use super::AdminState;

const SOURCE: &str = "infra::http::admin::content";

#[derive(Debug, Deserialize)]
pub(super) struct EventPayload {
    title: String,
    venue: String,
    city: String,
    #[serde(with = "time::serde::rfc3339")]
    starts_at: OffsetDateTime,
    #[serde(default)]
    ticket_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VideoPayload {
    title: String,
    embed_url: String,
    #[serde(default)]
    position: i32,
}

#[derive(Debug, Deserialize)]
pub(super) struct LyricPayload {
    title: String,
    body: String,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    position: i32,
}

#[derive(Debug, Deserialize)]
pub(super) struct BioPayload {
    body: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct InventoryPayload {
    sku: String,
    name: String,
    price_cents: i64,
    #[serde(default)]
    quantity: i32,
}

fn created<T: serde::Serialize>(value: T) -> Response {
    (StatusCode::CREATED, Json(value)).into_response()
}

pub(super) async fn create_event(
    State(state): State<AdminState>,
    Json(payload): Json<EventPayload>,
) -> Response {
    let params = CreateEventParams {
        title: payload.title,
        venue: payload.venue,
        city: payload.city,
        starts_at: payload.starts_at,
        ticket_url: payload.ticket_url,
    };
    match state.content.create_event(params).await {
        Ok(event) => created(event),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn update_event(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Response {
    let params = UpdateEventParams {
        id,
        title: payload.title,
        venue: payload.venue,
        city: payload.city,
        starts_at: payload.starts_at,
        ticket_url: payload.ticket_url,
    };
    match state.content.update_event(params).await {
        Ok(event) => Json(event).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn delete_event(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.content.delete_event(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn create_video(
    State(state): State<AdminState>,
    Json(payload): Json<VideoPayload>,
) -> Response {
    let params = CreateVideoParams {
        title: payload.title,
        embed_url: payload.embed_url,
        position: payload.position,
    };
    match state.content.create_video(params).await {
        Ok(video) => created(video),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn update_video(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VideoPayload>,
) -> Response {
    let params = UpdateVideoParams {
        id,
        title: payload.title,
        embed_url: payload.embed_url,
        position: payload.position,
    };
    match state.content.update_video(params).await {
        Ok(video) => Json(video).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn delete_video(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.content.delete_video(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn create_lyric(
    State(state): State<AdminState>,
    Json(payload): Json<LyricPayload>,
) -> Response {
    let params = CreateLyricParams {
        title: payload.title,
        body: payload.body,
        album: payload.album,
        position: payload.position,
    };
    match state.content.create_lyric(params).await {
        Ok(lyric) => created(lyric),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn update_lyric(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LyricPayload>,
) -> Response {
    let params = UpdateLyricParams {
        id,
        title: payload.title,
        body: payload.body,
        album: payload.album,
        position: payload.position,
    };
    match state.content.update_lyric(params).await {
        Ok(lyric) => Json(lyric).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn delete_lyric(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.content.delete_lyric(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn save_bio(
    State(state): State<AdminState>,
    Json(payload): Json<BioPayload>,
) -> Response {
    match state.content.save_bio(payload.body).await {
        Ok(bio) => Json(bio).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn create_item(
    State(state): State<AdminState>,
    Json(payload): Json<InventoryPayload>,
) -> Response {
    let params = CreateInventoryParams {
        sku: payload.sku,
        name: payload.name,
        price_cents: payload.price_cents,
        quantity: payload.quantity,
    };
    match state.content.create_item(params).await {
        Ok(item) => created(item),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn update_item(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InventoryPayload>,
) -> Response {
    let params = UpdateInventoryParams {
        id,
        sku: payload.sku,
        name: payload.name,
        price_cents: payload.price_cents,
        quantity: payload.quantity,
    };
    match state.content.update_item(params).await {
        Ok(item) => Json(item).into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn delete_item(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.content.delete_item(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => content_error_to_http(SOURCE, err).into_response(),
    }
}
