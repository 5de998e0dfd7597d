//! In-memory conversation store: useful for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use vedaguru_core::error::StoreError;
use vedaguru_core::message::{ChatRecord, Conversation, ConversationId};
use vedaguru_core::store::ConversationStore;

/// Conversations kept in a map for the life of the process.
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &ConversationId) -> StoreError {
    StoreError::NotFound(id.to_string())
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn create(&self, conversation: Conversation) -> Result<Conversation, StoreError> {
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(&conversation.id) {
            return Err(StoreError::Storage(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        conversations.insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn append(&self, id: &ConversationId, record: ChatRecord) -> Result<Conversation, StoreError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.get_mut(id).ok_or_else(|| not_found(id))?;
        conversation.push(record);
        Ok(conversation.clone())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError> {
        let conversations = self.conversations.read().await;
        let mut owned: Vec<Conversation> = conversations
            .values()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn rename(&self, id: &ConversationId, title: &str) -> Result<Conversation, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Storage("title must not be empty".into()));
        }
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.get_mut(id).ok_or_else(|| not_found(id))?;
        conversation.title = title.to_string();
        conversation.updated_at = Utc::now();
        Ok(conversation.clone())
    }

    async fn delete(&self, id: &ConversationId) -> Result<bool, StoreError> {
        Ok(self.conversations.write().await.remove(id).is_some())
    }
}
