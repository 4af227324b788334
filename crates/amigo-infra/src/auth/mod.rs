//! Session adapters.

mod memory;

pub use memory::InMemorySessionProvider;
