//! Content access for the public and admin surfaces.
//!
//! Every read goes through the cache under the resource's hot key; every
//! successful write evicts that resource's keys before returning.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{
    BioRepo, CreateEventParams, CreateInventoryParams, CreateLyricParams, CreateVideoParams,
    EventsRepo, InventoryRepo, LyricsRepo, RepoError, UpdateEventParams, UpdateInventoryParams,
    UpdateLyricParams, UpdateVideoParams, VideosRepo,
};
use crate::cache::{CacheRegistry, Resource};
use crate::domain::entities::{
    BioRecord, EventRecord, InventoryItem, InventoryMap, LyricRecord, VideoRecord,
};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Repository handles used by [`ContentService`].
#[derive(Clone)]
pub struct ContentRepos {
    pub events: Arc<dyn EventsRepo>,
    pub videos: Arc<dyn VideosRepo>,
    pub lyrics: Arc<dyn LyricsRepo>,
    pub bio: Arc<dyn BioRepo>,
    pub inventory: Arc<dyn InventoryRepo>,
}

impl ContentRepos {
    /// Use one adapter for every resource.
    pub fn from_shared<R>(repo: Arc<R>) -> Self
    where
        R: EventsRepo + VideosRepo + LyricsRepo + BioRepo + InventoryRepo + 'static,
    {
        Self {
            events: repo.clone(),
            videos: repo.clone(),
            lyrics: repo.clone(),
            bio: repo.clone(),
            inventory: repo,
        }
    }
}

#[derive(Clone)]
pub struct ContentService {
    cache: Arc<CacheRegistry>,
    repos: ContentRepos,
}

impl ContentService {
    pub fn new(cache: Arc<CacheRegistry>, repos: ContentRepos) -> Self {
        Self { cache, repos }
    }

    pub fn cache(&self) -> &Arc<CacheRegistry> {
        &self.cache
    }

    pub async fn list_events(&self) -> Result<Vec<EventRecord>, ContentError> {
        let resource = Resource::Events;
        let events = self
            .cache
            .get_or_fetch(&resource.hot_key(), resource.tier(), || {
                self.repos.events.list_events()
            })
            .await?;
        Ok(events)
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>, ContentError> {
        let resource = Resource::Videos;
        let videos = self
            .cache
            .get_or_fetch(&resource.hot_key(), resource.tier(), || {
                self.repos.videos.list_videos()
            })
            .await?;
        Ok(videos)
    }

    pub async fn list_lyrics(&self) -> Result<Vec<LyricRecord>, ContentError> {
        let resource = Resource::Lyrics;
        let lyrics = self
            .cache
            .get_or_fetch(&resource.hot_key(), resource.tier(), || {
                self.repos.lyrics.list_lyrics()
            })
            .await?;
        Ok(lyrics)
    }

    /// The biography; `None` is cached like any other value.
    pub async fn bio(&self) -> Result<Option<BioRecord>, ContentError> {
        let resource = Resource::Bio;
        let bio = self
            .cache
            .get_or_fetch(&resource.hot_key(), resource.tier(), || {
                self.repos.bio.load_bio()
            })
            .await?;
        Ok(bio)
    }

    pub async fn inventory(&self) -> Result<InventoryMap, ContentError> {
        let resource = Resource::Inventory;
        let inventory = self
            .cache
            .get_or_fetch(&resource.hot_key(), resource.tier(), || async {
                let items = self.repos.inventory.list_inventory().await?;
                Ok::<_, RepoError>(
                    items
                        .into_iter()
                        .map(|item| (item.sku.clone(), item))
                        .collect::<InventoryMap>(),
                )
            })
            .await?;
        Ok(inventory)
    }

    /// Read `resource` through the cache, discarding the value.
    pub async fn load(&self, resource: Resource) -> Result<(), ContentError> {
        match resource {
            Resource::Events => self.list_events().await.map(drop),
            Resource::Videos => self.list_videos().await.map(drop),
            Resource::Lyrics => self.list_lyrics().await.map(drop),
            Resource::Bio => self.bio().await.map(drop),
            Resource::Inventory => self.inventory().await.map(drop),
        }
    }

    pub async fn create_event(
        &self,
        params: CreateEventParams,
    ) -> Result<EventRecord, ContentError> {
        let event = self.repos.events.create_event(params).await?;
        self.evict(Resource::Events);
        Ok(event)
    }

    pub async fn update_event(
        &self,
        params: UpdateEventParams,
    ) -> Result<EventRecord, ContentError> {
        let event = self.repos.events.update_event(params).await?;
        self.evict(Resource::Events);
        Ok(event)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), ContentError> {
        self.repos.events.delete_event(id).await?;
        self.evict(Resource::Events);
        Ok(())
    }

    pub async fn create_video(
        &self,
        params: CreateVideoParams,
    ) -> Result<VideoRecord, ContentError> {
        let video = self.repos.videos.create_video(params).await?;
        self.evict(Resource::Videos);
        Ok(video)
    }

    pub async fn update_video(
        &self,
        params: UpdateVideoParams,
    ) -> Result<VideoRecord, ContentError> {
        let video = self.repos.videos.update_video(params).await?;
        self.evict(Resource::Videos);
        Ok(video)
    }

    pub async fn delete_video(&self, id: Uuid) -> Result<(), ContentError> {
        self.repos.videos.delete_video(id).await?;
        self.evict(Resource::Videos);
        Ok(())
    }

    pub async fn create_lyric(
        &self,
        params: CreateLyricParams,
    ) -> Result<LyricRecord, ContentError> {
        let lyric = self.repos.lyrics.create_lyric(params).await?;
        self.evict(Resource::Lyrics);
        Ok(lyric)
    }

    pub async fn update_lyric(
        &self,
        params: UpdateLyricParams,
    ) -> Result<LyricRecord, ContentError> {
        let lyric = self.repos.lyrics.update_lyric(params).await?;
        self.evict(Resource::Lyrics);
        Ok(lyric)
    }

    pub async fn delete_lyric(&self, id: Uuid) -> Result<(), ContentError> {
        self.repos.lyrics.delete_lyric(id).await?;
        self.evict(Resource::Lyrics);
        Ok(())
    }

    pub async fn save_bio(&self, body: String) -> Result<BioRecord, ContentError> {
        let bio = self.repos.bio.save_bio(body).await?;
        self.evict(Resource::Bio);
        Ok(bio)
    }

    pub async fn create_item(
        &self,
        params: CreateInventoryParams,
    ) -> Result<InventoryItem, ContentError> {
        let item = self.repos.inventory.create_item(params).await?;
        self.evict(Resource::Inventory);
        Ok(item)
    }

    pub async fn update_item(
        &self,
        params: UpdateInventoryParams,
    ) -> Result<InventoryItem, ContentError> {
        let item = self.repos.inventory.update_item(params).await?;
        self.evict(Resource::Inventory);
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), ContentError> {
        self.repos.inventory.delete_item(id).await?;
        self.evict(Resource::Inventory);
        Ok(())
    }

    fn evict(&self, resource: Resource) {
        let removed = self.cache.invalidator().resource(resource);
        debug!(
            target = "bandstand::application::content",
            resource = %resource,
            removed,
            "Content changed, cache evicted"
        );
    }
}
