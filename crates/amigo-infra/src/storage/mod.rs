//! Object storage adapters and image processing.

pub mod image;
mod intake;
mod memory;

pub use intake::{ImageIntake, IntakeError};
pub use memory::InMemoryObjectStorage;
