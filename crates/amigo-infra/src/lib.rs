//! # Amigo Infrastructure
//!
//! Concrete implementations of the ports defined in `amigo-core`.
//! Everything here is in-process: tokio-synchronized maps for persistence,
//! a broadcast-based change feed, and an object store that applies real
//! image transforms. The production deployment swaps these for the managed
//! backend behind the same traits.

pub mod auth;
pub mod cache;
pub mod realtime;
pub mod repository;
pub mod storage;

pub use auth::InMemorySessionProvider;
pub use cache::{FeedCache, InMemoryCache};
pub use realtime::InMemoryChangeFeed;
pub use repository::{
    InMemoryCommentRepository, InMemoryFollowRepository, InMemoryLikeRepository,
    InMemoryNotificationRepository, InMemoryPostRepository, InMemoryProfileRepository,
};
pub use storage::{ImageIntake, InMemoryObjectStorage};
