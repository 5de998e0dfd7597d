//! Message and Conversation domain types.
//!
//! [`Message`] is what goes over the wire to a provider (one system prompt,
//! one user turn). [`Conversation`] and [`ChatRecord`] are what gets kept:
//! each record is one question/answer exchange inside a conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title every conversation starts with until its first exchange lands.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Characters of the first message kept when deriving a title.
const TITLE_MAX_CHARS: usize = 50;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (persona, guidance)
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A single chat message as sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// One stored question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Unique record ID
    pub id: String,

    /// Owner, if the request was authenticated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// What the user asked
    pub message: String,

    /// What was answered (model output or cached reply)
    pub response: String,

    pub category: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    pub fn new(
        user_id: Option<String>,
        message: impl Into<String>,
        response: impl Into<String>,
        category: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            message: message.into(),
            response: response.into(),
            category: category.into(),
            topic: topic.into(),
            created_at: Utc::now(),
        }
    }
}

/// A conversation is an ordered sequence of exchanges on one category/topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,

    /// Owner; `None` for anonymous conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub title: String,
    pub category: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Exchanges in insertion order
    #[serde(default)]
    pub records: Vec<ChatRecord>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new(
        user_id: Option<String>,
        category: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            user_id,
            title: DEFAULT_TITLE.to_string(),
            category: category.into(),
            topic: topic.into(),
            created_at: now,
            updated_at: now,
            records: Vec::new(),
        }
    }

    /// Append an exchange and bump `updated_at`.
    ///
    /// The first exchange also names an untitled conversation.
    pub fn push(&mut self, record: ChatRecord) {
        self.updated_at = Utc::now();
        self.records.push(record);
        if self.title == DEFAULT_TITLE {
            self.title = derive_title(&self.records[0].message);
        }
    }

    /// Whether `user_id` may read, extend, rename or delete this conversation.
    ///
    /// Anonymous conversations are open to everyone. An owned conversation
    /// is only open to its owner, never to an anonymous caller.
    pub fn accessible_by(&self, user_id: Option<&str>) -> bool {
        match (self.user_id.as_deref(), user_id) {
            (None, _) => true,
            (Some(owner), Some(caller)) => owner == caller,
            (Some(_), None) => false,
        }
    }

    pub fn message_count(&self) -> usize {
        self.records.len()
    }
}

/// First 50 characters of the message, with an ellipsis when truncated.
pub fn derive_title(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("What is dharma?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "What is dharma?");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::system("persona")).unwrap();
        assert!(json.contains(r#""role":"system""#));
    }

    #[test]
    fn first_exchange_names_conversation() {
        let mut conv = Conversation::new(None, "epics", "gita");
        assert_eq!(conv.title, DEFAULT_TITLE);

        conv.push(ChatRecord::new(None, "Explain karma yoga", "...", "epics", "gita"));
        assert_eq!(conv.title, "Explain karma yoga");

        conv.push(ChatRecord::new(None, "And bhakti?", "...", "epics", "gita"));
        assert_eq!(conv.title, "Explain karma yoga");
        assert_eq!(conv.message_count(), 2);
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "a".repeat(80);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn title_truncation_respects_char_boundaries() {
        let devanagari = "ॐ".repeat(60);
        let title = derive_title(&devanagari);
        assert!(title.starts_with("ॐ"));
        assert!(title.ends_with("..."));
    }

    #[test]
    fn ownership_rules() {
        let owned = Conversation::new(Some("u1".into()), "vedas", "rigveda-general");
        assert!(owned.accessible_by(Some("u1")));
        assert!(!owned.accessible_by(Some("u2")));
        assert!(!owned.accessible_by(None));

        let anonymous = Conversation::new(None, "vedas", "rigveda-general");
        assert!(anonymous.accessible_by(Some("u2")));
        assert!(anonymous.accessible_by(None));
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new(None, "puranas", "vishnu");
        let created = conv.created_at;
        conv.push(ChatRecord::new(None, "hi", "नमो नारायणाय 🙏", "puranas", "vishnu"));
        assert!(conv.updated_at >= created);
    }
}
