//! Provider trait: the abstraction over LLM backends.
//!
//! A Provider knows how to send one system prompt plus one user message to an
//! LLM and get a complete reply back. Exactly one HTTP attempt per call;
//! retries, backoff and fallback replies live above this trait.
//!
//! Implementations: OpenAI-compatible chat completions (Mistral, Perplexity).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ProviderError;
use crate::message::Message;

/// The provider families the backend knows how to tune for.
///
/// Each family has its own model tiers and decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Mistral,
    Perplexity,
}

impl ProviderFamily {
    pub const ALL: [ProviderFamily; 2] = [ProviderFamily::Mistral, ProviderFamily::Perplexity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mistral => "mistral",
            Self::Perplexity => "perplexity",
        }
    }

    /// Parse a provider name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mistral" => Some(Self::Mistral),
            "perplexity" => Some(Self::Perplexity),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Mistral => "https://api.mistral.ai/v1",
            Self::Perplexity => "https://api.perplexity.ai",
        }
    }

    /// Environment variable holding this family's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Mistral => "MISTRAL_API_KEY",
            Self::Perplexity => "PERPLEXITY_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

/// A single chat-completion request.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// The model to use (e.g., "mistral-small-latest")
    pub model: String,

    /// System prompt followed by the user turn
    pub messages: Vec<Message>,

    pub sampling: SamplingParams,

    /// Family-specific body fields merged into the request JSON
    /// (e.g. `response_format`, `return_citations`)
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// Upper bound for this one attempt
    pub timeout: Duration,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text
    pub content: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Source URLs, when the provider returns them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The chat service calls `complete()` without knowing which backend is
/// being used. One call is one attempt.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "mistral").
    fn name(&self) -> &str;

    /// Which decision table applies to this provider.
    fn family(&self) -> ProviderFamily;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_parsing_is_case_insensitive() {
        assert_eq!(ProviderFamily::from_name("Mistral"), Some(ProviderFamily::Mistral));
        assert_eq!(ProviderFamily::from_name(" perplexity "), Some(ProviderFamily::Perplexity));
        assert_eq!(ProviderFamily::from_name("openai"), None);
    }

    #[test]
    fn family_round_trips_through_name() {
        for family in ProviderFamily::ALL {
            assert_eq!(ProviderFamily::from_name(family.as_str()), Some(family));
        }
    }

    #[test]
    fn usage_tolerates_missing_fields() {
        let usage: Usage = serde_json::from_str(r#"{"total_tokens": 42}"#).unwrap();
        assert_eq!(usage.total_tokens, 42);
        assert_eq!(usage.prompt_tokens, 0);
    }

    #[test]
    fn response_omits_empty_citations() {
        let resp = ProviderResponse {
            content: "ॐ".into(),
            usage: None,
            model: "mistral-small-latest".into(),
            citations: vec![],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("citations"));
    }
}
