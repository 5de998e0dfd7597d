//! # Vedaguru Core
//!
//! Domain types, traits, and error definitions for the Vedaguru chat backend.
//! This crate has **no I/O dependencies**: it defines the model that the
//! prompt, provider, memory and chat crates implement against.
//!
//! ## Design Philosophy
//!
//! The two seams that talk to the outside world are traits here:
//! - [`Provider`]: one chat-completion call to an LLM backend
//! - [`ConversationStore`]: where conversation history lives
//!
//! Implementations live in their own crates, so the chat service can be
//! exercised end-to-end with scripted providers and in-memory stores.

pub mod error;
pub mod message;
pub mod provider;
pub mod store;
pub mod topic;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, StoreError};
pub use message::{ChatRecord, Conversation, ConversationId, Message, Role};
pub use provider::{
    Provider, ProviderFamily, ProviderRequest, ProviderResponse, SamplingParams, Usage,
};
pub use store::ConversationStore;
pub use topic::TopicMatching;
