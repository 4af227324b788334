//! In-memory engagement repositories: likes, comments, follows and
//! notifications.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use amigo_core::domain::{Comment, Follow, Like, Notification};
use amigo_core::error::RepoError;
use amigo_core::ports::{
    CommentRepository, FollowRepository, LikeRepository, NotificationRepository,
};

/// Notification listings are capped, newest first.
const NOTIFICATION_LIST_CAP: usize = 50;

#[derive(Default)]
pub struct InMemoryLikeRepository {
    likes: RwLock<HashMap<(Uuid, Uuid), Like>>,
}

impl InMemoryLikeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        self.likes.write().await.insert(
            (post_id, user_id),
            Like {
                post_id,
                user_id,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        self.likes.write().await.remove(&(post_id, user_id));
        Ok(())
    }

    async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.likes.read().await.contains_key(&(post_id, user_id)))
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<usize, RepoError> {
        Ok(self
            .likes
            .read()
            .await
            .keys()
            .filter(|(p, _)| *p == post_id)
            .count())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError> {
        Ok(self
            .likes
            .read()
            .await
            .values()
            .filter(|like| like.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn add(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.comments.write().await.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

#[derive(Default)]
pub struct InMemoryFollowRepository {
    follows: RwLock<HashMap<(Uuid, Uuid), Follow>>,
}

impl InMemoryFollowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError> {
        if follower_id == followed_id {
            return Err(RepoError::Constraint("cannot follow yourself".to_owned()));
        }
        self.follows.write().await.insert(
            (follower_id, followed_id),
            Follow {
                follower_id,
                followed_id,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError> {
        self.follows
            .write()
            .await
            .remove(&(follower_id, followed_id));
        Ok(())
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .follows
            .read()
            .await
            .contains_key(&(follower_id, followed_id)))
    }

    async fn counts(&self, user_id: Uuid) -> Result<(usize, usize), RepoError> {
        let follows = self.follows.read().await;
        let followers = follows.keys().filter(|(_, to)| *to == user_id).count();
        let following = follows.keys().filter(|(from, _)| *from == user_id).count();
        Ok((followers, following))
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn push(&self, notification: Notification) -> Result<Notification, RepoError> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let mut list: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(NOTIFICATION_LIST_CAP);
        Ok(list)
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), RepoError> {
        if let Some(n) = self.notifications.write().await.get_mut(&id) {
            n.read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<(), RepoError> {
        for n in self.notifications.write().await.values_mut() {
            if n.user_id == user_id {
                n.read = true;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.notifications.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amigo_core::domain::NotificationKind;

    #[tokio::test]
    async fn likes_are_keyed_by_post_and_user() {
        let repo = InMemoryLikeRepository::new();
        let post = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        repo.like(post, a).await.unwrap();
        repo.like(post, a).await.unwrap(); // double-like collapses
        repo.like(post, b).await.unwrap();
        assert_eq!(repo.count_for_post(post).await.unwrap(), 2);

        repo.unlike(post, a).await.unwrap();
        assert!(!repo.is_liked(post, a).await.unwrap());
        assert!(repo.is_liked(post, b).await.unwrap());
    }

    #[tokio::test]
    async fn comments_list_oldest_first() {
        let repo = InMemoryCommentRepository::new();
        let post = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut early = Comment::new(post, user, "early".into());
        early.created_at = Utc::now() - chrono::Duration::minutes(1);
        let late = Comment::new(post, user, "late".into());
        repo.add(late).await.unwrap();
        repo.add(early).await.unwrap();

        let listed = repo.list_for_post(post).await.unwrap();
        let contents: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn self_follow_is_rejected() {
        let repo = InMemoryFollowRepository::new();
        let user = Uuid::new_v4();
        assert!(repo.follow(user, user).await.is_err());

        let other = Uuid::new_v4();
        repo.follow(user, other).await.unwrap();
        assert_eq!(repo.counts(other).await.unwrap(), (1, 0));
        assert_eq!(repo.counts(user).await.unwrap(), (0, 1));
    }

    #[tokio::test]
    async fn notification_listing_caps_and_sorts() {
        let repo = InMemoryNotificationRepository::new();
        let user = Uuid::new_v4();
        for i in 0..60 {
            let mut n = Notification::new(user, NotificationKind::Like, None);
            n.created_at = Utc::now() - chrono::Duration::seconds(i);
            repo.push(n).await.unwrap();
        }
        let listed = repo.list_for_user(user).await.unwrap();
        assert_eq!(listed.len(), 50);
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn mark_all_read() {
        let repo = InMemoryNotificationRepository::new();
        let user = Uuid::new_v4();
        let n1 = repo
            .push(Notification::new(user, NotificationKind::Follow, None))
            .await
            .unwrap();
        repo.push(Notification::new(user, NotificationKind::Comment, None))
            .await
            .unwrap();

        repo.mark_read(n1.id).await.unwrap();
        repo.mark_all_read(user).await.unwrap();
        assert!(repo
            .list_for_user(user)
            .await
            .unwrap()
            .iter()
            .all(|n| n.read));
    }
}
