//! Change feed port - row-change notifications from the persistence backend.
//!
//! The core never consumes incremental diffs; a change is an invalidation
//! signal. The cache layer subscribes and drops its entry for the affected
//! table, and readers re-fetch through the cache on their next access.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// The kind of row change observed in a watched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Insert,
    Update,
    Delete,
}

/// A change notification for a named table.
#[derive(Debug, Clone)]
pub struct TableChange {
    pub table: String,
    pub event: ChangeEvent,
}

/// Handler invoked for each change on a subscribed table.
pub type ChangeHandler =
    Box<dyn Fn(TableChange) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Change feed trait - abstraction over the realtime backend.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Announce a row change in `table`.
    async fn publish(&self, table: &str, event: ChangeEvent) -> Result<(), FeedError>;

    /// Subscribe to changes on `table`.
    async fn subscribe(&self, table: &str, handler: ChangeHandler) -> Result<(), FeedError>;

    /// Drop all subscriptions on `table`.
    async fn unsubscribe(&self, table: &str) -> Result<(), FeedError>;
}

/// Change feed errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to publish: {0}")]
    Publish(String),

    #[error("Failed to subscribe: {0}")]
    Subscribe(String),

    #[error("Connection error: {0}")]
    Connection(String),
}
