//! Feed cache - the invalidation consumer of the change feed.
//!
//! Any row change in a watched table drops that table's cached listing; the
//! next read fetches fresh data and refills the entry. The domain core never
//! sees any of this, it just reads through `get_or_fetch`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use amigo_core::ports::{Cache, CacheError, ChangeFeed, FeedError};

/// Cached table listings, invalidated by change-feed signals.
pub struct FeedCache {
    cache: Arc<dyn Cache>,
    feed: Arc<dyn ChangeFeed>,
    ttl: Option<Duration>,
}

impl FeedCache {
    pub fn new(cache: Arc<dyn Cache>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self {
            cache,
            feed,
            ttl: None,
        }
    }

    /// Bound entry lifetime even without change signals.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn key_for(table: &str) -> String {
        format!("feed:{table}")
    }

    /// Start invalidating this table's entry on every change signal.
    pub async fn watch(&self, table: &str) -> Result<(), FeedError> {
        let cache = Arc::clone(&self.cache);
        self.feed
            .subscribe(
                table,
                Box::new(move |change| {
                    let cache = Arc::clone(&cache);
                    Box::pin(async move {
                        let key = FeedCache::key_for(&change.table);
                        if let Err(e) = cache.invalidate(&key).await {
                            tracing::warn!(table = %change.table, error = %e, "Feed cache invalidation failed");
                        } else {
                            tracing::debug!(table = %change.table, "Feed cache invalidated");
                        }
                    })
                }),
            )
            .await
    }

    /// Read the cached listing for `table`, fetching and refilling on a miss.
    pub async fn get_or_fetch<F, Fut>(&self, table: &str, fetch: F) -> Result<String, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, CacheError>>,
    {
        let key = Self::key_for(table);
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }
        let fresh = fetch().await?;
        self.cache.set(&key, &fresh, self.ttl).await?;
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::realtime::InMemoryChangeFeed;
    use amigo_core::ports::ChangeEvent;

    fn feed_cache() -> (FeedCache, Arc<InMemoryChangeFeed>) {
        let feed = Arc::new(InMemoryChangeFeed::default());
        let cache = FeedCache::new(
            Arc::new(InMemoryCache::new()),
            Arc::clone(&feed) as Arc<dyn ChangeFeed>,
        );
        (cache, feed)
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let (cache, _feed) = feed_cache();
        let first = cache
            .get_or_fetch("posts", || async { Ok("v1".to_owned()) })
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("posts", || async { Ok("v2".to_owned()) })
            .await
            .unwrap();
        assert_eq!(first, "v1");
        assert_eq!(second, "v1");
    }

    #[tokio::test]
    async fn change_signal_invalidates_the_listing() {
        let (cache, feed) = feed_cache();
        cache.watch("posts").await.unwrap();

        cache
            .get_or_fetch("posts", || async { Ok("stale".to_owned()) })
            .await
            .unwrap();

        feed.publish("posts", ChangeEvent::Insert).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let refreshed = cache
            .get_or_fetch("posts", || async { Ok("fresh".to_owned()) })
            .await
            .unwrap();
        assert_eq!(refreshed, "fresh");
    }
}
