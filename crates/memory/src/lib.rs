//! Response cache and conversation storage for Vedaguru.

pub mod cache;
pub mod in_memory;

pub use cache::{CacheKey, CacheStats, ResponseCache};
pub use in_memory::InMemoryConversationStore;
