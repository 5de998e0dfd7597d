//! Chat orchestration for Vedaguru.
//!
//! [`ChatService`] ties the pieces together for one request: catalog
//! validation, the response cache, provider routing, prompt assembly, query
//! classification, the retry loop, fallback replies, analytics and
//! conversation history. Cache, analytics and store are injected so several
//! services (or tests) never share hidden global state.

pub mod error;
pub mod service;
pub mod types;

pub use error::ChatError;
pub use service::{ChatService, ChatSettings};
pub use types::{ChatReply, ChatRequest, ConversationRef};
