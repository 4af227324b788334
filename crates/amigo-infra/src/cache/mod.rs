//! Cache adapters and the feed invalidation layer.

mod feed;
mod memory;

pub use feed::FeedCache;
pub use memory::InMemoryCache;
