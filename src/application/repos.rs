//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{BioRecord, EventRecord, InventoryItem, LyricRecord, VideoRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventParams {
    pub title: String,
    pub venue: String,
    pub city: String,
    pub starts_at: OffsetDateTime,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateEventParams {
    pub id: Uuid,
    pub title: String,
    pub venue: String,
    pub city: String,
    pub starts_at: OffsetDateTime,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateVideoParams {
    pub title: String,
    pub embed_url: String,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateVideoParams {
    pub id: Uuid,
    pub title: String,
    pub embed_url: String,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct CreateLyricParams {
    pub title: String,
    pub body: String,
    pub album: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateLyricParams {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub album: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct CreateInventoryParams {
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateInventoryParams {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

#[async_trait]
pub trait EventsRepo: Send + Sync {
    /// Upcoming and past events, ordered by start time.
    async fn list_events(&self) -> Result<Vec<EventRecord>, RepoError>;

    async fn create_event(&self, params: CreateEventParams) -> Result<EventRecord, RepoError>;

    async fn update_event(&self, params: UpdateEventParams) -> Result<EventRecord, RepoError>;

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait VideosRepo: Send + Sync {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, RepoError>;

    async fn create_video(&self, params: CreateVideoParams) -> Result<VideoRecord, RepoError>;

    async fn update_video(&self, params: UpdateVideoParams) -> Result<VideoRecord, RepoError>;

    async fn delete_video(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait LyricsRepo: Send + Sync {
    async fn list_lyrics(&self) -> Result<Vec<LyricRecord>, RepoError>;

    async fn create_lyric(&self, params: CreateLyricParams) -> Result<LyricRecord, RepoError>;

    async fn update_lyric(&self, params: UpdateLyricParams) -> Result<LyricRecord, RepoError>;

    async fn delete_lyric(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait BioRepo: Send + Sync {
    /// The stored biography, or `None` before one has been written.
    async fn load_bio(&self) -> Result<Option<BioRecord>, RepoError>;

    async fn save_bio(&self, body: String) -> Result<BioRecord, RepoError>;
}

#[async_trait]
pub trait InventoryRepo: Send + Sync {
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, RepoError>;

    async fn create_item(&self, params: CreateInventoryParams) -> Result<InventoryItem, RepoError>;

    async fn update_item(&self, params: UpdateInventoryParams) -> Result<InventoryItem, RepoError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    /// Round-trip to the database.
    async fn ping(&self) -> Result<(), RepoError>;
}
