//! Engagement entities - likes, comments, follows and notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A like, keyed by `(post_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// A follow edge, keyed by `(follower_id, followed_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub related_user_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, kind: NotificationKind, related_user_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            related_user_id,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Human-readable summary, with the related user shortened to the first
    /// eight characters of their id.
    pub fn summary(&self) -> String {
        let who = self
            .related_user_id
            .map(|id| id.simple().to_string()[..8].to_owned())
            .unwrap_or_else(|| "someone".to_owned());
        match self.kind {
            NotificationKind::Like => format!("User {who} liked your post"),
            NotificationKind::Comment => format!("User {who} commented on your post"),
            NotificationKind::Follow => format!("User {who} started following you"),
            NotificationKind::Unknown => "New notification".to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            NotificationKind::Like => "❤️",
            NotificationKind::Comment => "💬",
            NotificationKind::Follow => "👤",
            NotificationKind::Unknown => "🔔",
        }
    }
}

/// Relative timestamp for notification rows: "just now", then minutes,
/// hours and days, falling back to the date after a week.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);
    match seconds {
        0..60 => "just now".to_owned(),
        60..3600 => format!("{}m ago", seconds / 60),
        3600..86400 => format!("{}h ago", seconds / 3600),
        86400..604800 => format!("{}d ago", seconds / 86400),
        _ => timestamp.format("%b %-d, %Y").to_string(),
    }
}
