use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Like, Notification, Post, Profile};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post persistence, the narrow contract the feed and composer hand
/// payloads to.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// One user's posts, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Targeted edit of a plain post's content. Blog posts have no edit
    /// path; calling this on one is a constraint violation.
    async fn update_content(&self, id: Uuid, content: String) -> Result<(), RepoError>;
}

/// Profile persistence, keyed by the owning user id.
#[async_trait]
pub trait ProfileRepository: BaseRepository<Profile, Uuid> {}

/// Likes, keyed by `(post_id, user_id)`.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;
    async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;
    async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;
    async fn count_for_post(&self, post_id: Uuid) -> Result<usize, RepoError>;
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add(&self, comment: Comment) -> Result<Comment, RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Follow edges, keyed by `(follower_id, followed_id)`.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError>;
    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError>;
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError>;
    /// (followers, following) counts for a user.
    async fn counts(&self, user_id: Uuid) -> Result<(usize, usize), RepoError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn push(&self, notification: Notification) -> Result<Notification, RepoError>;
    /// The user's notifications, newest first, capped at 50.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError>;
    async fn mark_read(&self, id: Uuid) -> Result<(), RepoError>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<(), RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
