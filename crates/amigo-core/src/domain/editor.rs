//! Post composer - the editing session for one in-progress blog post.
//!
//! The composer exclusively owns its block list; every mutation is a pure
//! local-state transition applied in gesture order. Mutations addressed to an
//! id that is not in the list are silently ignored rather than escalated.

use chrono::Utc;
use uuid::Uuid;

use super::block::{
    Block, BlockId, BlockKind, BlockSettings, ImageShape, MIN_BLOCK_HEIGHT, MIN_BLOCK_WIDTH,
};
use super::post::{BlockRecord, BlogPost, Post, PostBody, TripType, promote_cover};
use crate::error::DomainError;

/// A typed settings mutation. Changes addressed to a block whose settings
/// are of a different shape are ignored, mirroring the unknown-id no-op rule.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    ImageUrl(String),
    Shape(ImageShape),
    Rounded(bool),
    Darken(bool),
    /// Replace the item at `index`; out-of-range indices are ignored.
    Item { index: usize, text: String },
    /// Append an empty item to a list or checklist.
    AddItem,
    MapCountry(String),
    MapCoords { lat: f64, lng: f64 },
}

/// The single in-progress pointer interaction. Exactly one can be active at
/// a time; pointer-up ends it unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Drag(BlockId),
    Resize(BlockId),
    Rotate(BlockId),
}

impl Interaction {
    pub fn target(&self) -> BlockId {
        match *self {
            Interaction::Drag(id) | Interaction::Resize(id) | Interaction::Rotate(id) => id,
        }
    }
}

/// Editing session for a new blog post.
#[derive(Debug, Default)]
pub struct Composer {
    pub title: String,
    pub country: String,
    pub duration: String,
    pub trip_type: TripType,
    pub hashtags: String,
    blocks: Vec<Block>,
    selected: Option<BlockId>,
    interaction: Option<Interaction>,
    next_id: u64,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selected(&self) -> Option<BlockId> {
        self.selected
    }

    pub fn interaction(&self) -> Option<Interaction> {
        self.interaction
    }

    /// Append a block with type-appropriate defaults and select it.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        self.next_id += 1;
        let id = BlockId(self.next_id);
        self.blocks.push(Block::new(id, kind));
        self.selected = Some(id);
        id
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Replace the free-form content of the matching block.
    pub fn update_content(&mut self, id: BlockId, text: impl Into<String>) {
        if let Some(block) = self.block_mut(id) {
            block.content = text.into();
        }
    }

    /// Apply a typed settings change to the matching block.
    pub fn update_setting(&mut self, id: BlockId, change: SettingChange) {
        let Some(block) = self.block_mut(id) else {
            return;
        };
        match (&mut block.settings, change) {
            (BlockSettings::Image { url, .. }, SettingChange::ImageUrl(new)) => *url = new,
            (BlockSettings::Image { shape, .. }, SettingChange::Shape(new)) => *shape = new,
            (BlockSettings::Image { rounded, .. }, SettingChange::Rounded(new)) => *rounded = new,
            (BlockSettings::Image { darken, .. }, SettingChange::Darken(new)) => *darken = new,
            (BlockSettings::Items { items }, SettingChange::Item { index, text }) => {
                if let Some(item) = items.get_mut(index) {
                    *item = text;
                }
            }
            (BlockSettings::Items { items }, SettingChange::AddItem) => items.push(String::new()),
            (BlockSettings::Map { country, .. }, SettingChange::MapCountry(new)) => *country = new,
            (BlockSettings::Map { lat, lng, .. }, SettingChange::MapCoords { lat: a, lng: b }) => {
                *lat = a;
                *lng = b;
            }
            _ => {}
        }
    }

    /// Remove the block. Clears selection if it pointed at the block and
    /// cancels the in-flight interaction if the block was its target.
    pub fn delete_block(&mut self, id: BlockId) {
        self.blocks.retain(|b| b.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.interaction.map(|i| i.target()) == Some(id) {
            self.interaction = None;
        }
    }

    /// Move the block at `from` so it ends up at index `to`, shifting the
    /// blocks in between. Called once per pointer-move during a list drag,
    /// so every intermediate state is a valid ordering.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.blocks.len() || to >= self.blocks.len() || from == to {
            return;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
    }

    /// Translate a block on the canvas.
    pub fn move_by(&mut self, id: BlockId, dx: f64, dy: f64) {
        if let Some(block) = self.block_mut(id)
            && let Some(geo) = &mut block.geometry
        {
            geo.x += dx;
            geo.y += dy;
        }
    }

    /// Resize a block, clamped to the minimum canvas size.
    pub fn resize(&mut self, id: BlockId, width: f64, height: f64) {
        if let Some(block) = self.block_mut(id)
            && let Some(geo) = &mut block.geometry
        {
            geo.width = width.max(MIN_BLOCK_WIDTH);
            geo.height = height.max(MIN_BLOCK_HEIGHT);
        }
    }

    /// Rotate a block toward the pointer. The angle is measured from the
    /// block center to the pointer, offset by 90 degrees so the rotation
    /// handle above the block aligns with pointer angle zero.
    pub fn rotate_toward(&mut self, id: BlockId, pointer_x: f64, pointer_y: f64) {
        if let Some(block) = self.block_mut(id)
            && let Some(geo) = &mut block.geometry
        {
            let (cx, cy) = geo.center();
            let angle = (pointer_y - cy).atan2(pointer_x - cx).to_degrees();
            geo.rotation = angle + 90.0;
        }
    }

    /// Begin a pointer interaction. Starting a new one replaces any active
    /// one; an unknown id is ignored.
    pub fn begin(&mut self, interaction: Interaction) {
        if self.blocks.iter().any(|b| b.id == interaction.target()) {
            self.interaction = Some(interaction);
        }
    }

    /// End the active interaction, wherever the pointer is released.
    pub fn pointer_up(&mut self) {
        self.interaction = None;
    }

    /// Validate and assemble the final post payload.
    ///
    /// Blocks are normalized to reading order (sorted by `y` then `x` when
    /// every block carries geometry), the cover image is promoted to the
    /// front, and each block is mapped to its persisted record shape.
    pub fn publish(&self, user_id: Uuid) -> Result<Post, DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("a title is required".into()));
        }
        if self.country.trim().is_empty() {
            return Err(DomainError::Validation("a country is required".into()));
        }
        if self.duration.trim().is_empty() {
            return Err(DomainError::Validation("a duration is required".into()));
        }

        let mut blocks = self.blocks.clone();
        normalize_reading_order(&mut blocks);
        promote_cover(&mut blocks);

        Ok(Post {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            body: PostBody::Blog(BlogPost {
                title: self.title.trim().to_owned(),
                blocks: blocks.into_iter().map(BlockRecord::from).collect(),
                country: self.country.trim().to_owned(),
                duration: self.duration.trim().to_owned(),
                trip_type: self.trip_type,
                hashtags: self.hashtags.trim().to_owned(),
            }),
        })
    }
}

/// Sort blocks into reading order by `(y, x)`. Only applies when every block
/// has canvas geometry; a list without geometry already is its own reading
/// order. The sort is stable, so exact ties keep their list order.
fn normalize_reading_order(blocks: &mut [Block]) {
    if blocks.iter().all(|b| b.geometry.is_some()) {
        blocks.sort_by(|a, b| {
            let ga = a.geometry.as_ref().unwrap();
            let gb = b.geometry.as_ref().unwrap();
            (ga.y, ga.x)
                .partial_cmp(&(gb.y, gb.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}
