//! In-memory change feed.
//!
//! Single-process stand-in for the managed backend's realtime channel: one
//! broadcast channel per watched table, handlers driven by a spawned task.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use amigo_core::ports::{ChangeEvent, ChangeFeed, ChangeHandler, FeedError, TableChange};

/// In-memory change feed.
pub struct InMemoryChangeFeed {
    tables: Arc<RwLock<HashMap<String, broadcast::Sender<ChangeEvent>>>>,
    buffer_size: usize,
}

impl InMemoryChangeFeed {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }
}

impl Default for InMemoryChangeFeed {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl ChangeFeed for InMemoryChangeFeed {
    async fn publish(&self, table: &str, event: ChangeEvent) -> Result<(), FeedError> {
        let tables = self.tables.read().await;
        if let Some(sender) = tables.get(table) {
            // Send errors just mean nobody is subscribed.
            let _ = sender.send(event);
            tracing::debug!(table = %table, ?event, "Change published");
        } else {
            tracing::debug!(table = %table, "No subscribers for table");
        }
        Ok(())
    }

    async fn subscribe(&self, table: &str, handler: ChangeHandler) -> Result<(), FeedError> {
        let mut tables = self.tables.write().await;
        let sender = tables
            .entry(table.to_owned())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);

        let mut receiver = sender.subscribe();
        let table_name = table.to_owned();

        tokio::spawn(async move {
            tracing::debug!(table = %table_name, "Subscribed to table changes");
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        handler(TableChange {
                            table: table_name.clone(),
                            event,
                        })
                        .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        // Dropped signals are fine: invalidation is idempotent,
                        // the next one covers it.
                        tracing::warn!(table = %table_name, lagged = count, "Subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!(table = %table_name, "Change channel closed");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    async fn unsubscribe(&self, table: &str) -> Result<(), FeedError> {
        let mut tables = self.tables.write().await;
        tables.remove(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn subscriber_sees_published_changes() {
        let feed = InMemoryChangeFeed::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        feed.subscribe(
            "posts",
            Box::new(move |change| {
                let counter = Arc::clone(&counter);
                Box::pin(async move {
                    assert_eq!(change.table, "posts");
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            }),
        )
        .await
        .unwrap();

        feed.publish("posts", ChangeEvent::Insert).await.unwrap();
        feed.publish("posts", ChangeEvent::Delete).await.unwrap();
        // Unwatched table, nobody cares.
        feed.publish("likes", ChangeEvent::Insert).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let feed = InMemoryChangeFeed::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        feed.subscribe(
            "posts",
            Box::new(move |_| {
                let counter = Arc::clone(&counter);
                Box::pin(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            }),
        )
        .await
        .unwrap();

        feed.unsubscribe("posts").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        feed.publish("posts", ChangeEvent::Insert).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
