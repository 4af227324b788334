//! Domain entities and logic - the core business objects.

pub mod block;
pub mod editor;
pub mod engagement;
pub mod post;
pub mod render;
mod user;

pub use block::{Block, BlockId, BlockKind, BlockSettings, Geometry, ImageShape};
pub use editor::{Composer, Interaction, SettingChange};
pub use engagement::{Comment, Follow, Like, Notification, NotificationKind};
pub use post::{BlockRecord, BlogPost, Post, PostBody, TripType};
pub use render::{DisplayNode, Theme, render_post};
pub use user::Profile;
