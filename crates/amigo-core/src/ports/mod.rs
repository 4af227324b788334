//! Ports - trait definitions for the external collaborators.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod realtime;
mod repository;
pub mod storage;

pub use auth::{AuthError, Session, SessionHandler, SessionProvider};
pub use cache::{Cache, CacheError};
pub use realtime::{ChangeEvent, ChangeFeed, ChangeHandler, FeedError, TableChange};
pub use repository::{
    BaseRepository, CommentRepository, FollowRepository, LikeRepository, NotificationRepository,
    PostRepository, ProfileRepository,
};
pub use storage::{ImageFormat, ObjectStorage, StorageError, TransformOptions};
