//! In-memory repositories shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bandstand::application::content::{ContentRepos, ContentService};
use bandstand::application::repos::{
    BioRepo, CreateEventParams, CreateInventoryParams, CreateLyricParams, CreateVideoParams,
    EventsRepo, HealthRepo, InventoryRepo, LyricsRepo, RepoError, UpdateEventParams,
    UpdateInventoryParams, UpdateLyricParams, UpdateVideoParams, VideosRepo,
};
use bandstand::cache::{CacheConfig, CacheRegistry, Resource};
use bandstand::domain::entities::{
    BioRecord, EventRecord, InventoryItem, LyricRecord, VideoRecord,
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Per-resource read counters.
#[derive(Default)]
pub struct ReadCounts {
    events: AtomicUsize,
    videos: AtomicUsize,
    lyrics: AtomicUsize,
    bio: AtomicUsize,
    inventory: AtomicUsize,
}

impl ReadCounts {
    fn slot(&self, resource: Resource) -> &AtomicUsize {
        match resource {
            Resource::Events => &self.events,
            Resource::Videos => &self.videos,
            Resource::Lyrics => &self.lyrics,
            Resource::Bio => &self.bio,
            Resource::Inventory => &self.inventory,
        }
    }
}

#[derive(Default)]
pub struct MemoryRepo {
    events: Mutex<Vec<EventRecord>>,
    videos: Mutex<Vec<VideoRecord>>,
    lyrics: Mutex<Vec<LyricRecord>>,
    bio: Mutex<Option<BioRecord>>,
    inventory: Mutex<BTreeMap<Uuid, InventoryItem>>,
    reads: ReadCounts,
    failing_reads: Mutex<Vec<Resource>>,
    fail_writes: AtomicBool,
    database_down: AtomicBool,
}

impl MemoryRepo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reads(&self, resource: Resource) -> usize {
        self.reads.slot(resource).load(Ordering::SeqCst)
    }

    pub fn fail_reads_of(&self, resource: Resource) {
        self.failing_reads.lock().unwrap().push(resource);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_database_down(&self, down: bool) {
        self.database_down.store(down, Ordering::SeqCst);
    }

    fn read(&self, resource: Resource) -> Result<(), RepoError> {
        self.reads.slot(resource).fetch_add(1, Ordering::SeqCst);
        if self.failing_reads.lock().unwrap().contains(&resource) {
            return Err(RepoError::from_persistence(format!(
                "{resource} table unavailable"
            )));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(RepoError::from_persistence("write rejected"))
        } else {
            Ok(())
        }
    }

    pub fn seed_event(&self, city: &str) -> EventRecord {
        let now = OffsetDateTime::now_utc();
        let record = EventRecord {
            id: Uuid::new_v4(),
            title: format!("Live in {city}"),
            venue: "Main hall".to_string(),
            city: city.to_string(),
            starts_at: now,
            ticket_url: None,
            created_at: now,
            updated_at: now,
        };
        self.events.lock().unwrap().push(record.clone());
        record
    }
}

pub fn service_with(repo: Arc<MemoryRepo>, config: CacheConfig) -> ContentService {
    let cache = Arc::new(CacheRegistry::new(config));
    ContentService::new(cache, ContentRepos::from_shared(repo))
}

pub fn event_params(city: &str) -> CreateEventParams {
    CreateEventParams {
        title: format!("Live in {city}"),
        venue: "Main hall".to_string(),
        city: city.to_string(),
        starts_at: OffsetDateTime::now_utc(),
        ticket_url: Some("https://tickets.example/1".to_string()),
    }
}

#[async_trait]
impl EventsRepo for MemoryRepo {
    async fn list_events(&self) -> Result<Vec<EventRecord>, RepoError> {
        self.read(Resource::Events)?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create_event(&self, params: CreateEventParams) -> Result<EventRecord, RepoError> {
        self.write()?;
        let now = OffsetDateTime::now_utc();
        let record = EventRecord {
            id: Uuid::new_v4(),
            title: params.title,
            venue: params.venue,
            city: params.city,
            starts_at: params.starts_at,
            ticket_url: params.ticket_url,
            created_at: now,
            updated_at: now,
        };
        self.events.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_event(&self, params: UpdateEventParams) -> Result<EventRecord, RepoError> {
        self.write()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|event| event.id == params.id)
            .ok_or(RepoError::NotFound)?;
        event.title = params.title;
        event.venue = params.venue;
        event.city = params.city;
        event.starts_at = params.starts_at;
        event.ticket_url = params.ticket_url;
        event.updated_at = OffsetDateTime::now_utc();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError> {
        self.write()?;
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|event| event.id != id);
        if events.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl VideosRepo for MemoryRepo {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, RepoError> {
        self.read(Resource::Videos)?;
        Ok(self.videos.lock().unwrap().clone())
    }

    async fn create_video(&self, params: CreateVideoParams) -> Result<VideoRecord, RepoError> {
        self.write()?;
        let record = VideoRecord {
            id: Uuid::new_v4(),
            title: params.title,
            embed_url: params.embed_url,
            position: params.position,
            created_at: OffsetDateTime::now_utc(),
        };
        self.videos.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_video(&self, params: UpdateVideoParams) -> Result<VideoRecord, RepoError> {
        self.write()?;
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .iter_mut()
            .find(|video| video.id == params.id)
            .ok_or(RepoError::NotFound)?;
        video.title = params.title;
        video.embed_url = params.embed_url;
        video.position = params.position;
        Ok(video.clone())
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), RepoError> {
        self.write()?;
        self.videos.lock().unwrap().retain(|video| video.id != id);
        Ok(())
    }
}

#[async_trait]
impl LyricsRepo for MemoryRepo {
    async fn list_lyrics(&self) -> Result<Vec<LyricRecord>, RepoError> {
        self.read(Resource::Lyrics)?;
        Ok(self.lyrics.lock().unwrap().clone())
    }

    async fn create_lyric(&self, params: CreateLyricParams) -> Result<LyricRecord, RepoError> {
        self.write()?;
        let record = LyricRecord {
            id: Uuid::new_v4(),
            title: params.title,
            body: params.body,
            album: params.album,
            position: params.position,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lyrics.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_lyric(&self, params: UpdateLyricParams) -> Result<LyricRecord, RepoError> {
        self.write()?;
        let mut lyrics = self.lyrics.lock().unwrap();
        let lyric = lyrics
            .iter_mut()
            .find(|lyric| lyric.id == params.id)
            .ok_or(RepoError::NotFound)?;
        lyric.title = params.title;
        lyric.body = params.body;
        lyric.album = params.album;
        lyric.position = params.position;
        Ok(lyric.clone())
    }

    async fn delete_lyric(&self, id: Uuid) -> Result<(), RepoError> {
        self.write()?;
        self.lyrics.lock().unwrap().retain(|lyric| lyric.id != id);
        Ok(())
    }
}

#[async_trait]
impl BioRepo for MemoryRepo {
    async fn load_bio(&self) -> Result<Option<BioRecord>, RepoError> {
        self.read(Resource::Bio)?;
        Ok(self.bio.lock().unwrap().clone())
    }

    async fn save_bio(&self, body: String) -> Result<BioRecord, RepoError> {
        self.write()?;
        let record = BioRecord {
            body,
            updated_at: OffsetDateTime::now_utc(),
        };
        *self.bio.lock().unwrap() = Some(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl InventoryRepo for MemoryRepo {
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, RepoError> {
        self.read(Resource::Inventory)?;
        Ok(self.inventory.lock().unwrap().values().cloned().collect())
    }

    async fn create_item(&self, params: CreateInventoryParams) -> Result<InventoryItem, RepoError> {
        self.write()?;
        let mut inventory = self.inventory.lock().unwrap();
        if inventory.values().any(|item| item.sku == params.sku) {
            return Err(RepoError::Duplicate {
                constraint: "inventory_sku_key".to_string(),
            });
        }
        let record = InventoryItem {
            id: Uuid::new_v4(),
            sku: params.sku,
            name: params.name,
            price_cents: params.price_cents,
            quantity: params.quantity,
            updated_at: OffsetDateTime::now_utc(),
        };
        inventory.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_item(&self, params: UpdateInventoryParams) -> Result<InventoryItem, RepoError> {
        self.write()?;
        let mut inventory = self.inventory.lock().unwrap();
        let item = inventory.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        item.sku = params.sku;
        item.name = params.name;
        item.price_cents = params.price_cents;
        item.quantity = params.quantity;
        item.updated_at = OffsetDateTime::now_utc();
        Ok(item.clone())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError> {
        self.write()?;
        self.inventory
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl HealthRepo for MemoryRepo {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.database_down.load(Ordering::SeqCst) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}
