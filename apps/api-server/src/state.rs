//! Application state - shared across all handlers.

use std::sync::Arc;

use amigo_core::ports::{ChangeFeed, ObjectStorage, PostRepository};
use amigo_infra::{
    FeedCache, ImageIntake, InMemoryCache, InMemoryChangeFeed, InMemoryObjectStorage,
    InMemoryPostRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub intake: Arc<ImageIntake>,
    pub feed_cache: Arc<FeedCache>,
}

impl AppState {
    /// Build the application state with the in-memory adapters.
    pub async fn new(config: &AppConfig) -> Self {
        let change_feed: Arc<dyn ChangeFeed> = Arc::new(InMemoryChangeFeed::default());
        let posts: Arc<dyn PostRepository> =
            Arc::new(InMemoryPostRepository::with_feed(Arc::clone(&change_feed)));
        let storage: Arc<dyn ObjectStorage> =
            Arc::new(InMemoryObjectStorage::new(config.storage_base_url.clone()));
        let intake = Arc::new(ImageIntake::new(storage));

        let feed_cache = Arc::new(FeedCache::new(
            Arc::new(InMemoryCache::new()),
            Arc::clone(&change_feed),
        ));
        if let Err(e) = feed_cache.watch("posts").await {
            tracing::warn!(error = %e, "Feed cache watch failed; listings will not be cached");
        }

        Self {
            posts,
            intake,
            feed_cache,
        }
    }
}
