//! Block schema - the typed content units a blog post is composed of.

use serde::{Deserialize, Serialize};

/// Minimum block width on the canvas. Resizes are clamped so a block can
/// never shrink past its handles.
pub const MIN_BLOCK_WIDTH: f64 = 100.0;
/// Minimum block height on the canvas.
pub const MIN_BLOCK_HEIGHT: f64 = 50.0;

/// Canvas origin offset for newly added blocks.
pub const DEFAULT_ORIGIN: (f64, f64) = (100.0, 100.0);

/// Identifier for a block within one post.
///
/// Issued by the composer's monotonic counter, so two blocks created in the
/// same instant still get distinct ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct BlockId(pub u64);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of content a block holds.
///
/// `Unknown` absorbs kinds this version does not recognize; such blocks
/// deserialize fine and render as nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Divider,
    List,
    Checklist,
    Map,
    #[serde(other)]
    Unknown,
}

/// Display shape for an image block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImageShape {
    #[default]
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "polaroid")]
    Polaroid,
}

/// Type-dependent block settings.
///
/// Serialized untagged: the stored shape is a plain settings object whose
/// keys identify the variant (`shape`/`rounded` for images, `items` for
/// lists and checklists, `country`/`lat`/`lng` for maps, `{}` otherwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockSettings {
    Image {
        #[serde(default)]
        url: String,
        shape: ImageShape,
        #[serde(default)]
        rounded: bool,
        #[serde(default)]
        darken: bool,
    },
    Items { items: Vec<String> },
    Map {
        country: String,
        lat: f64,
        lng: f64,
    },
    None {},
}

impl BlockSettings {
    /// Type-appropriate defaults for a freshly added block.
    pub fn defaults_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Image => BlockSettings::Image {
                url: String::new(),
                shape: ImageShape::Square,
                rounded: false,
                darken: false,
            },
            // Lists and checklists start with one empty item ready for input.
            BlockKind::List | BlockKind::Checklist => BlockSettings::Items {
                items: vec![String::new()],
            },
            BlockKind::Map => BlockSettings::Map {
                country: String::new(),
                lat: 0.0,
                lng: 0.0,
            },
            _ => BlockSettings::None {},
        }
    }

    /// The image URL, if these are image settings with a non-empty URL.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            BlockSettings::Image { url, .. } if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// Free-form canvas placement of a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
}

impl Geometry {
    /// Default placement for a new block of the given kind.
    pub fn defaults_for(kind: BlockKind) -> Self {
        let (width, height) = match kind {
            BlockKind::Text => (300.0, 60.0),
            _ => (200.0, 200.0),
        };
        Self {
            x: DEFAULT_ORIGIN.0,
            y: DEFAULT_ORIGIN.1,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Center point of the block, used as the rotation pivot.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A single content unit within a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Free-form text payload; body text for `text` blocks, the location
    /// label for `map` blocks, unused for the rest.
    pub content: String,
    pub settings: BlockSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Block {
    /// Build a block of `kind` with type-appropriate default settings and
    /// default canvas placement.
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            content: String::new(),
            settings: BlockSettings::defaults_for(kind),
            geometry: Some(Geometry::defaults_for(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_defaults() {
        let block = Block::new(BlockId(1), BlockKind::Image);
        assert_eq!(
            block.settings,
            BlockSettings::Image {
                url: String::new(),
                shape: ImageShape::Square,
                rounded: false,
                darken: false,
            }
        );
        assert!(block.settings.image_url().is_none());
    }

    #[test]
    fn list_defaults_have_one_empty_item() {
        let block = Block::new(BlockId(2), BlockKind::Checklist);
        assert_eq!(
            block.settings,
            BlockSettings::Items {
                items: vec![String::new()]
            }
        );
    }

    #[test]
    fn text_blocks_are_wider_than_tall() {
        let geo = Block::new(BlockId(3), BlockKind::Text).geometry.unwrap();
        assert_eq!((geo.width, geo.height), (300.0, 60.0));
        let geo = Block::new(BlockId(4), BlockKind::Map).geometry.unwrap();
        assert_eq!((geo.width, geo.height), (200.0, 200.0));
    }

    #[test]
    fn shape_serializes_to_storage_names() {
        assert_eq!(
            serde_json::to_string(&ImageShape::FourThree).unwrap(),
            "\"4:3\""
        );
        assert_eq!(
            serde_json::to_string(&ImageShape::SixteenNine).unwrap(),
            "\"16:9\""
        );
    }

    #[test]
    fn unknown_kind_deserializes() {
        let block: Block = serde_json::from_str(
            r#"{"id": 7, "type": "calendar", "content": "", "settings": {}}"#,
        )
        .unwrap();
        assert_eq!(block.kind, BlockKind::Unknown);
        assert_eq!(block.settings, BlockSettings::None {});
    }

    #[test]
    fn settings_round_trip_through_storage_shape() {
        let settings = BlockSettings::Image {
            url: "https://x/img.jpg".into(),
            shape: ImageShape::Polaroid,
            rounded: true,
            darken: false,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["shape"], "polaroid");
        let back: BlockSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);
    }
}
