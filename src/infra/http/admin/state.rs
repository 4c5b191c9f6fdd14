use std::sync::Arc;
use std::time::Instant;

use crate::application::content::ContentService;
use crate::application::repos::HealthRepo;
use crate::cache::CacheRegistry;

#[derive(Clone)]
pub struct AdminState {
    pub content: Arc<ContentService>,
    pub cache: Arc<CacheRegistry>,
    pub health: Arc<dyn HealthRepo>,
    pub started_at: Instant,
}
