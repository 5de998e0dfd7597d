//! ConversationStore trait: where conversation history lives.
//!
//! The chat service only needs create/get/append; list, rename and delete
//! back the conversation management surface that fronts the service.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::message::{ChatRecord, Conversation, ConversationId};

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new conversation and return it.
    async fn create(&self, conversation: Conversation) -> Result<Conversation, StoreError>;

    /// Fetch a conversation by ID.
    async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError>;

    /// Append an exchange, returning the updated conversation.
    async fn append(
        &self,
        id: &ConversationId,
        record: ChatRecord,
    ) -> Result<Conversation, StoreError>;

    /// Conversations owned by `user_id`, most recently updated first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError>;

    /// Change a conversation's title.
    async fn rename(&self, id: &ConversationId, title: &str) -> Result<Conversation, StoreError>;

    /// Remove a conversation. Returns `true` if something was deleted.
    async fn delete(&self, id: &ConversationId) -> Result<bool, StoreError>;

    /// Backend name (for diagnostics).
    fn name(&self) -> &str;
}
