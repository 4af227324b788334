//! Post renderer - pure mapping from a stored post to display nodes.
//!
//! The theme is an explicit parameter; nothing here reads ambient state, so
//! the same post and theme always produce the same output.

use super::block::{BlockKind, BlockSettings, ImageShape};
use super::post::{BlockRecord, ChipPalette, Post, PostBody, hashtag_chips};
use crate::ports::storage::{ImageFormat, ObjectStorage, TransformOptions};

/// Storage path prefix public post-image URLs carry.
const PUBLIC_POSTS_PREFIX: &str = "/object/public/posts/";

/// Width requested for feed-optimized image variants.
const DISPLAY_IMAGE_WIDTH: u32 = 800;

/// Resolved color palette handed to every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: &'static str,
    pub card_background: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub pink: &'static str,
    pub pink_light: &'static str,
    pub navy: &'static str,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: "#F6F6EF",
            card_background: "#FFFFFF",
            text: "#393D3F",
            text_secondary: "#6B6B6B",
            border: "#E8E8E0",
            pink: "#FECAC5",
            pink_light: "#FEE5E1",
            navy: "#393D3F",
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#2d2d2d",
            card_background: "#393D3F",
            text: "#F6F6EF",
            text_secondary: "#B5B5B5",
            border: "#4d4d4d",
            pink: "#FECAC5",
            pink_light: "#FEE5E1",
            navy: "#393D3F",
        }
    }
}

/// A metadata chip: icon, label and resolved colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub icon: &'static str,
    pub label: String,
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

impl Chip {
    fn plain(icon: &'static str, label: String, theme: &Theme) -> Self {
        Self {
            icon,
            label,
            background: theme.background,
            border: theme.border,
            text: theme.text,
        }
    }

    fn colored(icon: &'static str, label: String, palette: ChipPalette) -> Self {
        Self {
            icon,
            label,
            background: palette.background,
            border: palette.border,
            text: palette.text,
        }
    }
}

/// Deterministic image presentation derived from block settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageStyle {
    /// Aspect ratio as (width, height).
    pub aspect: (u8, u8),
    pub corner_radius: u8,
    /// Polaroid framing: internal padding and a light background behind the
    /// image, plus a drop shadow.
    pub framed: bool,
    pub darken: bool,
}

impl ImageStyle {
    pub fn new(shape: ImageShape, rounded: bool, darken: bool) -> Self {
        // Only square and 4:3 get their own ratio; everything else,
        // polaroid included, takes the wide one.
        let aspect = match shape {
            ImageShape::Square => (1, 1),
            ImageShape::FourThree => (4, 3),
            ImageShape::SixteenNine | ImageShape::Polaroid => (16, 9),
        };
        let corner_radius = if rounded {
            16
        } else if shape == ImageShape::Polaroid {
            8
        } else {
            0
        };
        Self {
            aspect,
            corner_radius,
            framed: shape == ImageShape::Polaroid,
            darken,
        }
    }
}

/// One element of the rendered post.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Heading(String),
    ChipRow(Vec<Chip>),
    /// Body text, literal line breaks preserved.
    Paragraph(String),
    Image { url: String, style: ImageStyle },
    Rule,
    Bullets(Vec<String>),
    /// Label plus disabled checkbox per item.
    Checklist(Vec<String>),
    MapCard { label: String },
    TagRow(Vec<String>),
}

/// Render a stored post into an ordered sequence of display nodes.
pub fn render_post(post: &Post, theme: &Theme) -> Vec<DisplayNode> {
    match &post.body {
        PostBody::Plain { content } => vec![DisplayNode::Paragraph(content.clone())],
        PostBody::Blog(blog) => {
            let mut nodes = vec![DisplayNode::Heading(blog.title.clone())];

            let mut chips = Vec::new();
            if !blog.country.is_empty() {
                chips.push(Chip::plain("📍", blog.country.clone(), theme));
            }
            if !blog.duration.is_empty() {
                chips.push(Chip::plain("⏱️", blog.duration.clone(), theme));
            }
            chips.push(Chip::colored(
                blog.trip_type.icon(),
                blog.trip_type.label().to_owned(),
                blog.trip_type.palette(),
            ));
            nodes.push(DisplayNode::ChipRow(chips));

            nodes.extend(blog.blocks.iter().filter_map(render_block));

            let tags = hashtag_chips(&blog.hashtags);
            if !tags.is_empty() {
                nodes.push(DisplayNode::TagRow(tags));
            }
            nodes
        }
    }
}

/// Map a single block record to a display node. Unknown kinds and shapes the
/// renderer cannot interpret yield `None`, never an error.
fn render_block(record: &BlockRecord) -> Option<DisplayNode> {
    match record.kind {
        BlockKind::Text => Some(DisplayNode::Paragraph(record.content.clone())),
        BlockKind::Image => match &record.settings {
            BlockSettings::Image {
                url,
                shape,
                rounded,
                darken,
            } => Some(DisplayNode::Image {
                url: url.clone(),
                style: ImageStyle::new(*shape, *rounded, *darken),
            }),
            _ => None,
        },
        BlockKind::Divider => Some(DisplayNode::Rule),
        BlockKind::List | BlockKind::Checklist => match &record.settings {
            BlockSettings::Items { items } => {
                let kept: Vec<String> = items
                    .iter()
                    .filter(|item| !item.trim().is_empty())
                    .cloned()
                    .collect();
                if record.kind == BlockKind::List {
                    Some(DisplayNode::Bullets(kept))
                } else {
                    Some(DisplayNode::Checklist(kept))
                }
            }
            _ => None,
        },
        BlockKind::Map => Some(DisplayNode::MapCard {
            label: record.content.clone(),
        }),
        BlockKind::Unknown => None,
    }
}

/// Resolve the URL to actually display for a stored post image: a resized
/// webp variant from the storage collaborator when the stored URL is one of
/// ours, the stored URL untouched otherwise or on any transform failure.
pub async fn display_image_url(storage: &dyn ObjectStorage, url: &str) -> String {
    let Some((_, path)) = url.split_once(PUBLIC_POSTS_PREFIX) else {
        return url.to_owned();
    };
    let options = TransformOptions {
        width: Some(DISPLAY_IMAGE_WIDTH),
        format: Some(ImageFormat::Webp),
        quality: Some(80),
    };
    match storage.public_url(path, Some(options)).await {
        Ok(optimized) => optimized,
        Err(_) => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::{Block, BlockId};
    use crate::domain::post::{BlogPost, TripType};
    use chrono::Utc;
    use uuid::Uuid;

    fn blog_post(blocks: Vec<BlockRecord>, hashtags: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            body: PostBody::Blog(BlogPost {
                title: "Tokyo Trip".into(),
                blocks,
                country: "Japan".into(),
                duration: "7 days".into(),
                trip_type: TripType::Adventure,
                hashtags: hashtags.into(),
            }),
        }
    }

    fn record(kind: BlockKind, content: &str, settings: BlockSettings) -> BlockRecord {
        let mut block = Block::new(BlockId(1), kind);
        block.content = content.into();
        block.settings = settings;
        BlockRecord::from(block)
    }

    #[test]
    fn plain_posts_render_as_one_paragraph() {
        let post = Post::new_plain(Uuid::new_v4(), "hello\nworld".into()).unwrap();
        let nodes = render_post(&post, &Theme::light());
        assert_eq!(nodes, vec![DisplayNode::Paragraph("hello\nworld".into())]);
    }

    #[test]
    fn blog_post_renders_heading_chips_blocks_tags() {
        let blocks = vec![
            record(BlockKind::Text, "Great food", BlockSettings::None {}),
            record(BlockKind::Divider, "", BlockSettings::None {}),
        ];
        let nodes = render_post(&blog_post(blocks, "travel #food"), &Theme::light());

        assert_eq!(nodes[0], DisplayNode::Heading("Tokyo Trip".into()));
        let DisplayNode::ChipRow(chips) = &nodes[1] else {
            panic!("expected chip row");
        };
        assert_eq!(chips[0].icon, "📍");
        assert_eq!(chips[0].label, "Japan");
        assert_eq!(chips[1].icon, "⏱️");
        assert_eq!(chips[2].icon, "🏔️");
        assert_eq!(chips[2].label, "Adventure");

        assert_eq!(nodes[2], DisplayNode::Paragraph("Great food".into()));
        assert_eq!(nodes[3], DisplayNode::Rule);
        assert_eq!(
            nodes[4],
            DisplayNode::TagRow(vec!["#travel".into(), "#food".into()])
        );
    }

    #[test]
    fn renderer_is_pure() {
        let post = blog_post(
            vec![record(BlockKind::Text, "once", BlockSettings::None {})],
            "",
        );
        let theme = Theme::dark();
        assert_eq!(render_post(&post, &theme), render_post(&post, &theme));
    }

    #[test]
    fn whitespace_items_are_filtered() {
        let settings = BlockSettings::Items {
            items: vec!["pack".into(), "   ".into(), String::new(), "go".into()],
        };
        let nodes = render_post(
            &blog_post(vec![record(BlockKind::Checklist, "", settings)], ""),
            &Theme::light(),
        );
        assert_eq!(
            nodes[2],
            DisplayNode::Checklist(vec!["pack".into(), "go".into()])
        );
    }

    #[test]
    fn unknown_kind_renders_nothing() {
        let mut rec = record(BlockKind::Text, "x", BlockSettings::None {});
        rec.kind = BlockKind::Unknown;
        let nodes = render_post(&blog_post(vec![rec], ""), &Theme::light());
        // Heading and chip row only.
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn image_style_derivation() {
        let style = ImageStyle::new(ImageShape::FourThree, false, false);
        assert_eq!(style.aspect, (4, 3));
        assert_eq!(style.corner_radius, 0);
        assert!(!style.framed);

        let style = ImageStyle::new(ImageShape::SixteenNine, true, true);
        assert_eq!(style.aspect, (16, 9));
        assert_eq!(style.corner_radius, 16);
        assert!(!style.framed);
        assert!(style.darken);
    }

    #[test]
    fn polaroid_is_framed_but_keeps_the_wide_aspect() {
        let style = ImageStyle::new(ImageShape::Polaroid, false, false);
        assert_eq!(style.aspect, (16, 9));
        assert_eq!(style.corner_radius, 8);
        assert!(style.framed);
    }

    #[test]
    fn map_blocks_render_the_label() {
        let settings = BlockSettings::Map {
            country: String::new(),
            lat: 0.0,
            lng: 0.0,
        };
        let nodes = render_post(
            &blog_post(vec![record(BlockKind::Map, "Paris, France", settings)], ""),
            &Theme::light(),
        );
        assert_eq!(
            nodes[2],
            DisplayNode::MapCard {
                label: "Paris, France".into()
            }
        );
    }
}
