//! Post model - plain feed posts and block-composed blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::block::{Block, BlockId, BlockKind, BlockSettings, Geometry};
use crate::error::DomainError;

/// Character ceiling for plain post content.
pub const PLAIN_POST_MAX_CHARS: usize = 280;

/// A published post. The body discriminant is always explicit: a post is a
/// blog post exactly when it is tagged as one, never inferred from field
/// presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: PostBody,
}

/// The two post shapes sharing one storage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "post_type", rename_all = "lowercase")]
pub enum PostBody {
    /// Short text post, at most [`PLAIN_POST_MAX_CHARS`] characters.
    Plain { content: String },
    /// Block-composed blog post with travel metadata.
    Blog(BlogPost),
}

/// The blog-post payload: title, ordered block records and travel metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub blocks: Vec<BlockRecord>,
    pub country: String,
    pub duration: String,
    pub trip_type: TripType,
    /// Space-separated tokens, each optionally prefixed with `#`.
    #[serde(default)]
    pub hashtags: String,
}

/// Persisted shape of a block: the block itself plus denormalized `url`/`alt`
/// conveniences mirroring `settings.url`, so feed queries can pick a cover
/// image without unpacking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
    pub settings: BlockSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        let url = block.settings.image_url().map(str::to_owned);
        let alt = url.as_ref().map(|_| "Post content".to_owned());
        Self {
            id: block.id,
            kind: block.kind,
            content: block.content,
            settings: block.settings,
            geometry: block.geometry,
            url,
            alt,
        }
    }
}

/// Trip category attached to a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TripType {
    Luxury,
    Adventure,
    #[default]
    Casual,
    Wellness,
    Eco,
}

/// Fixed chip colors for a trip type, independent of the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipPalette {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

impl TripType {
    pub fn label(&self) -> &'static str {
        match self {
            TripType::Luxury => "Luxury",
            TripType::Adventure => "Adventure",
            TripType::Casual => "Casual",
            TripType::Wellness => "Wellness",
            TripType::Eco => "Eco",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TripType::Luxury => "✨",
            TripType::Adventure => "🏔️",
            TripType::Casual => "🌴",
            TripType::Wellness => "🧘",
            TripType::Eco => "🌿",
        }
    }

    pub fn palette(&self) -> ChipPalette {
        match self {
            TripType::Luxury => ChipPalette {
                background: "#fff5e6",
                border: "#ffa726",
                text: "#e65100",
            },
            TripType::Adventure => ChipPalette {
                background: "#e8f5e9",
                border: "#66bb6a",
                text: "#2e7d32",
            },
            TripType::Casual => ChipPalette {
                background: "#e3f2fd",
                border: "#42a5f5",
                text: "#1565c0",
            },
            TripType::Wellness => ChipPalette {
                background: "#f3e5f5",
                border: "#ab47bc",
                text: "#6a1b9a",
            },
            TripType::Eco => ChipPalette {
                background: "#e0f2f1",
                border: "#26a69a",
                text: "#00695c",
            },
        }
    }
}

impl Post {
    /// Build a plain post, validating the 1-280 character content rule.
    pub fn new_plain(user_id: Uuid, content: String) -> Result<Self, DomainError> {
        validate_plain_content(&content)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            body: PostBody::Plain { content },
        })
    }
}

/// Validate plain post content: non-empty after trim, at most 280 characters.
pub fn validate_plain_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("post content is empty".into()));
    }
    if content.chars().count() > PLAIN_POST_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "post content exceeds {PLAIN_POST_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

/// Move the first image block carrying a non-empty URL to index 0, where the
/// feed treats it as the cover image. The relative order of all other blocks
/// is preserved. No-op when no such block exists or it is already first;
/// idempotent.
pub fn promote_cover(blocks: &mut Vec<Block>) {
    let cover = blocks
        .iter()
        .position(|b| b.kind == BlockKind::Image && b.settings.image_url().is_some());
    if let Some(index) = cover
        && index > 0
    {
        let block = blocks.remove(index);
        blocks.insert(0, block);
    }
}

/// Split a hashtag string into display chips: whitespace-separated tokens,
/// blanks dropped, `#` prefixed where absent.
pub fn hashtag_chips(hashtags: &str) -> Vec<String> {
    hashtags
        .split_whitespace()
        .map(|tag| {
            if tag.starts_with('#') {
                tag.to_owned()
            } else {
                format!("#{tag}")
            }
        })
        .collect()
}
