//! Shared application state handed to every handler.

use std::sync::Arc;

use awards_core::storage::AwardsDatabase;

use crate::auth::JwtManager;
use crate::cache::{CacheScope, ResponseCache};
use crate::config::Settings;
use crate::rate_limit::RateLimiter;
use crate::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub db: AwardsDatabase,
    pub jwt: Arc<JwtManager>,
    pub cache: Arc<ResponseCache>,
    pub limiter: Arc<RateLimiter>,
    pub uploads: Arc<UploadStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: AwardsDatabase, settings: Settings) -> Self {
        let cache = ResponseCache::new(settings.cache_capacity);
        Self::with_cache(db, settings, cache)
    }

    /// Build state around a preconfigured cache (e.g. with short TTLs).
    pub fn with_cache(db: AwardsDatabase, settings: Settings, cache: ResponseCache) -> Self {
        Self {
            db,
            jwt: Arc::new(JwtManager::new(
                settings.jwt_secret.as_bytes(),
                settings.access_ttl,
            )),
            cache: Arc::new(cache),
            limiter: Arc::new(RateLimiter::new()),
            uploads: Arc::new(UploadStore::new(settings.upload_dir.clone())),
            settings: Arc::new(settings),
        }
    }

    /// Drop cached responses built from any of `scopes`.
    pub async fn invalidate(&self, scopes: &[CacheScope]) {
        self.cache.invalidate_all(scopes).await;
    }
}
