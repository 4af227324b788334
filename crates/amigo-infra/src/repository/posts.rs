//! In-memory post and profile repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use amigo_core::domain::{Post, PostBody, Profile};
use amigo_core::error::RepoError;
use amigo_core::ports::{
    BaseRepository, ChangeEvent, ChangeFeed, PostRepository, ProfileRepository,
};

/// In-memory post repository. When wired with a change feed it announces
/// every mutation on the `posts` table, driving cache invalidation.
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    feed: Option<Arc<dyn ChangeFeed>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            feed: None,
        }
    }

    pub fn with_feed(feed: Arc<dyn ChangeFeed>) -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            feed: Some(feed),
        }
    }

    async fn announce(&self, event: ChangeEvent) {
        if let Some(feed) = &self.feed
            && let Err(e) = feed.publish("posts", event).await
        {
            tracing::warn!(error = %e, "Failed to announce post change");
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let event = {
            let mut posts = self.posts.write().await;
            let event = if posts.contains_key(&post.id) {
                ChangeEvent::Update
            } else {
                ChangeEvent::Insert
            };
            posts.insert(post.id, post.clone());
            event
        };
        self.announce(event).await;
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let removed = self.posts.write().await.remove(&id).is_some();
        if removed {
            self.announce(ChangeEvent::Delete).await;
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<(), RepoError> {
        {
            let mut posts = self.posts.write().await;
            let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;
            match &mut post.body {
                PostBody::Plain { content: existing } => *existing = content,
                PostBody::Blog(_) => {
                    return Err(RepoError::Constraint(
                        "blog posts have no edit path".to_owned(),
                    ));
                }
            }
        }
        self.announce(ChangeEvent::Update).await;
        Ok(())
    }
}

/// In-memory profile repository, keyed by the owning user id.
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Profile, Uuid> for InMemoryProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn save(&self, profile: Profile) -> Result<Profile, RepoError> {
        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.profiles.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let user = Uuid::new_v4();
        let mut first = Post::new_plain(user, "first".into()).unwrap();
        let mut second = Post::new_plain(user, "second".into()).unwrap();
        first.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        second.created_at = chrono::Utc::now();
        repo.save(first).await.unwrap();
        repo.save(second).await.unwrap();

        let listed = repo.list().await.unwrap();
        let contents: Vec<&str> = listed
            .iter()
            .map(|p| match &p.body {
                PostBody::Plain { content } => content.as_str(),
                PostBody::Blog(blog) => blog.title.as_str(),
            })
            .collect();
        assert_eq!(contents, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn update_content_targets_plain_posts_only() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new_plain(Uuid::new_v4(), "before".into()).unwrap();
        let id = post.id;
        repo.save(post).await.unwrap();

        repo.update_content(id, "after".into()).await.unwrap();
        let PostBody::Plain { content } = repo.find_by_id(id).await.unwrap().unwrap().body else {
            panic!("expected plain post");
        };
        assert_eq!(content, "after");

        let missing = repo.update_content(Uuid::new_v4(), "x".into()).await;
        assert!(matches!(missing, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new_plain(Uuid::new_v4(), "gone".into()).unwrap();
        let id = post.id;
        repo.save(post).await.unwrap();
        repo.delete(id).await.unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn profiles_upsert() {
        let repo = InMemoryProfileRepository::new();
        let user = Uuid::new_v4();
        let mut profile = Profile::new(user);
        repo.save(profile.clone()).await.unwrap();
        profile.update(Some("ana".into()), Some("hello".into())).unwrap();
        repo.save(profile).await.unwrap();

        let loaded = repo.find_by_id(user).await.unwrap().unwrap();
        assert_eq!(loaded.username.as_deref(), Some("ana"));
    }
}
