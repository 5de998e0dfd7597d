//! Inbound and outbound shapes of one chat exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vedaguru_core::provider::Usage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub category: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Provider family name; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Set by whatever authenticates the caller, never by the caller itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, category: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: category.into(),
            topic: topic.into(),
            conversation_id: None,
            provider: None,
            user_id: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub category: String,
    pub topic: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<u8>,
    /// Seconds
    pub response_time: f64,
    pub timestamp: DateTime<Utc>,
    pub cached: bool,
    /// Failure tag when `response` is a fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationRef>,
}

impl ChatReply {
    /// Whether the text came from a model (fresh or cached) rather than a fallback.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
