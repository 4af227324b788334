//! Change feed adapters.

mod memory;

pub use memory::InMemoryChangeFeed;
