//! Repository adapters.

mod engagement;
mod posts;

pub use engagement::{
    InMemoryCommentRepository, InMemoryFollowRepository, InMemoryLikeRepository,
    InMemoryNotificationRepository,
};
pub use posts::{InMemoryPostRepository, InMemoryProfileRepository};
