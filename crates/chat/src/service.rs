//! The chat service: one request in, one reply out.
//!
//! validate → conversation lookup → route → cache → prompt → classify →
//! profile → retry loop → (reply | fallback) → analytics → persistence.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use vedaguru_config::AppConfig;
use vedaguru_core::TopicMatching;
use vedaguru_core::message::{ChatRecord, Conversation, ConversationId, Message};
use vedaguru_core::provider::{Provider, ProviderRequest};
use vedaguru_core::store::ConversationStore;
use vedaguru_memory::{CacheKey, CacheStats, InMemoryConversationStore, ResponseCache};
use vedaguru_prompts::{GenerationProfile, QueryAnalysis, build_system_prompt, catalog, fallback, is_short_query};
use vedaguru_providers::{FailureTag, ProviderRouter, RetryPolicy, RouteError, complete_with_retry};
use vedaguru_telemetry::{Analytics, AnalyticsSummary};

use crate::error::ChatError;
use crate::types::{ChatReply, ChatRequest, ConversationRef};

/// Tunables the service reads from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatSettings {
    pub cache_enabled: bool,
    pub topic_matching: TopicMatching,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            topic_matching: TopicMatching::default(),
        }
    }
}

impl ChatSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache_enabled: config.cache.enabled,
            topic_matching: config.prompts.topic_matching,
        }
    }
}

/// A request that passed validation.
struct Validated<'a> {
    message: &'a str,
    category: &'a str,
    topic: &'a str,
}

/// Where the reply text came from.
enum Outcome {
    Model {
        text: String,
        model: String,
        usage: Option<vedaguru_core::provider::Usage>,
        citations: Vec<String>,
    },
    Cached(String),
    Failed {
        text: String,
        tag: FailureTag,
        model: Option<String>,
    },
}

pub struct ChatService {
    router: Arc<ProviderRouter>,
    cache: Arc<ResponseCache>,
    analytics: Arc<Analytics>,
    store: Arc<dyn ConversationStore>,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(
        router: Arc<ProviderRouter>,
        cache: Arc<ResponseCache>,
        analytics: Arc<Analytics>,
        store: Arc<dyn ConversationStore>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            router,
            cache,
            analytics,
            store,
            settings,
        }
    }

    /// Wire a service from configuration with an in-memory conversation store.
    pub fn from_config(config: &AppConfig) -> Self {
        let router = vedaguru_providers::build_from_config(config);
        let cache = ResponseCache::new(
            config.cache.max_entries,
            std::time::Duration::from_secs(config.cache.ttl_secs),
        );
        Self::new(
            Arc::new(router),
            Arc::new(cache),
            Arc::new(Analytics::new()),
            Arc::new(InMemoryConversationStore::new()),
            ChatSettings::from_config(config),
        )
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn analytics_summary(&self) -> AnalyticsSummary {
        self.analytics.summary()
    }

    /// Answer one chat request.
    ///
    /// Only validation, ownership and storage-read problems are errors.
    /// Provider failures of any kind come back as an `Ok` reply carrying
    /// fallback text and an `error` tag.
    pub async fn respond(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let started = Instant::now();
        let valid = validate(&request)?;
        let user_id = request.user_id.as_deref();

        let existing = self.find_conversation(request.conversation_id.as_deref(), user_id).await?;
        let short_query = is_short_query(valid.message);

        let provider_name = request
            .provider
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| self.router.default_family().to_string());

        let provider = match self.router.resolve(request.provider.as_deref()) {
            Ok(provider) => provider,
            Err(e) => {
                let text = match &e {
                    RouteError::Unconfigured(family) => fallback::configuration_reply(*family),
                    RouteError::Unknown(name) => fallback::unknown_provider_reply(name),
                };
                warn!(provider = %provider_name, error = %e, "Provider unavailable");
                self.analytics.track_error(
                    valid.category,
                    valid.topic,
                    &FailureTag::Configuration.to_string(),
                    &e.to_string(),
                );
                let outcome = Outcome::Failed { text, tag: FailureTag::Configuration, model: None };
                let elapsed = started.elapsed().as_secs_f64();
                return Ok(reply(&valid, provider_name, elapsed, outcome, None, None));
            }
        };

        let family = provider.family();
        let cache_key = CacheKey::new(family, valid.category, valid.topic, valid.message);
        if self.settings.cache_enabled {
            if let Some(text) = self.cache.get(&cache_key) {
                info!(provider = %family, category = valid.category, topic = valid.topic, "Using cached response");
                let elapsed = started.elapsed().as_secs_f64();
                self.analytics
                    .track_response(valid.category, valid.topic, "cache", elapsed, None);
                let conversation = self.persist(existing, user_id, &valid, &text).await;
                return Ok(reply(&valid, family.to_string(), elapsed, Outcome::Cached(text), None, conversation));
            }
        }

        let system_prompt = build_system_prompt(
            valid.category,
            valid.topic,
            short_query,
            self.settings.topic_matching,
        );
        let analysis = QueryAnalysis::analyze(valid.message, &system_prompt);
        let profile = GenerationProfile::select(family, &analysis, short_query);
        debug!(
            category = analysis.category,
            complexity = analysis.complexity,
            words = analysis.word_count,
            short_query,
            model = profile.model,
            "Classified query"
        );

        let outcome = self
            .generate(provider.as_ref(), &valid, system_prompt, &profile, short_query)
            .await;
        let elapsed = started.elapsed().as_secs_f64();

        let conversation = match &outcome {
            Outcome::Model { text, model, usage, .. } => {
                self.analytics.track_response(
                    valid.category,
                    valid.topic,
                    model,
                    elapsed,
                    usage.map(|u| u.total_tokens),
                );
                if self.settings.cache_enabled {
                    self.cache.put(cache_key, text.clone());
                }
                self.persist(existing, user_id, &valid, text).await
            }
            Outcome::Failed { .. } | Outcome::Cached(_) => None,
        };

        Ok(reply(
            &valid,
            family.to_string(),
            elapsed,
            outcome,
            Some(analysis.complexity),
            conversation,
        ))
    }

    async fn generate(
        &self,
        provider: &dyn Provider,
        valid: &Validated<'_>,
        system_prompt: String,
        profile: &GenerationProfile,
        short_query: bool,
    ) -> Outcome {
        let request = ProviderRequest {
            model: profile.model.to_string(),
            messages: vec![Message::system(system_prompt), Message::user(valid.message)],
            sampling: profile.sampling,
            extra: profile.extra_body(),
            timeout: profile.timeout,
        };
        let policy = RetryPolicy {
            max_attempts: profile.max_attempts,
            backoff_factor: profile.backoff_factor,
            timeout: profile.timeout,
        };

        match complete_with_retry(provider, request, &policy).await {
            Ok(done) => Outcome::Model {
                text: done.response.content,
                model: done.response.model,
                usage: done.response.usage,
                citations: done.response.citations,
            },
            Err(failure) => {
                warn!(
                    provider = provider.name(),
                    category = valid.category,
                    topic = valid.topic,
                    tag = %failure.tag,
                    attempts = failure.attempts,
                    error = %failure.last_error,
                    "Falling back to canned reply"
                );
                self.analytics.track_error(
                    valid.category,
                    valid.topic,
                    &failure.tag.to_string(),
                    &failure.last_error.to_string(),
                );
                Outcome::Failed {
                    text: fallback::fallback_reply(valid.category, short_query),
                    tag: failure.tag,
                    model: Some(profile.model.to_string()),
                }
            }
        }
    }

    /// Resolve `conversation_id`. An unknown id is not an error: a new
    /// conversation is started when the exchange is saved.
    async fn find_conversation(
        &self,
        conversation_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Option<Conversation>, ChatError> {
        let Some(raw) = conversation_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let id = ConversationId::from(raw);
        match self.store.get(&id).await? {
            Some(conversation) if !conversation.accessible_by(user_id) => {
                warn!(conversation = %id, "Conversation belongs to another user");
                Err(ChatError::Forbidden(id.to_string()))
            }
            Some(conversation) => Ok(Some(conversation)),
            None => {
                warn!(conversation = %id, "Conversation not found, a new one will be created");
                Ok(None)
            }
        }
    }

    /// Save the exchange. Storage trouble is logged and the reply goes out
    /// without a conversation reference.
    async fn persist(
        &self,
        existing: Option<Conversation>,
        user_id: Option<&str>,
        valid: &Validated<'_>,
        response: &str,
    ) -> Option<ConversationRef> {
        let conversation = match existing {
            Some(c) => c,
            None => {
                let fresh = Conversation::new(user_id.map(String::from), valid.category, valid.topic);
                match self.store.create(fresh).await {
                    Ok(c) => c,
                    Err(e) => {
                        warn!(store = self.store.name(), error = %e, "Failed to create conversation");
                        return None;
                    }
                }
            }
        };

        let record = ChatRecord::new(
            user_id.map(String::from),
            valid.message,
            response,
            valid.category,
            valid.topic,
        );
        match self.store.append(&conversation.id, record).await {
            Ok(updated) => Some(ConversationRef {
                id: updated.id.to_string(),
                title: updated.title,
            }),
            Err(e) => {
                warn!(store = self.store.name(), conversation = %conversation.id, error = %e, "Failed to save exchange");
                None
            }
        }
    }

    /// Conversations owned by `user_id`, most recent first.
    pub async fn conversations(&self, user_id: &str) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.store.list_for_user(user_id).await?)
    }

    /// Fetch one conversation, enforcing ownership.
    pub async fn conversation(&self, id: &str, user_id: Option<&str>) -> Result<Conversation, ChatError> {
        let id = ConversationId::from(id);
        let conversation = self
            .store
            .get(&id)
            .await?
            .ok_or_else(|| vedaguru_core::StoreError::NotFound(id.to_string()))?;
        if !conversation.accessible_by(user_id) {
            return Err(ChatError::Forbidden(id.to_string()));
        }
        Ok(conversation)
    }

    pub async fn rename_conversation(
        &self,
        id: &str,
        user_id: Option<&str>,
        title: &str,
    ) -> Result<Conversation, ChatError> {
        let conversation = self.conversation(id, user_id).await?;
        Ok(self.store.rename(&conversation.id, title).await?)
    }

    pub async fn delete_conversation(&self, id: &str, user_id: Option<&str>) -> Result<bool, ChatError> {
        let conversation = self.conversation(id, user_id).await?;
        Ok(self.store.delete(&conversation.id).await?)
    }
}

fn validate(request: &ChatRequest) -> Result<Validated<'_>, ChatError> {
    let message = request.message.trim();
    let category = request.category.trim();
    let topic = request.topic.trim();

    let missing: Vec<&str> = [("message", message), ("category", category), ("topic", topic)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();
    if !missing.is_empty() {
        return Err(ChatError::Validation(format!("Required fields: {}", missing.join(", "))));
    }

    if catalog::category(category).is_none() {
        return Err(ChatError::Validation(format!("Invalid category: {category}")));
    }
    if catalog::topic(category, topic).is_none() {
        return Err(ChatError::Validation(format!(
            "Invalid topic: {topic} for category: {category}"
        )));
    }

    Ok(Validated { message, category, topic })
}

fn reply(
    valid: &Validated<'_>,
    provider: String,
    response_time: f64,
    outcome: Outcome,
    complexity_score: Option<u8>,
    conversation: Option<ConversationRef>,
) -> ChatReply {
    let mut reply = ChatReply {
        response: String::new(),
        category: valid.category.to_string(),
        topic: valid.topic.to_string(),
        provider,
        model: None,
        complexity_score,
        response_time,
        timestamp: Utc::now(),
        cached: false,
        error: None,
        token_usage: None,
        citations: Vec::new(),
        conversation,
    };
    match outcome {
        Outcome::Model { text, model, usage, citations } => {
            reply.response = text;
            reply.model = Some(model);
            reply.token_usage = usage;
            reply.citations = citations;
        }
        Outcome::Cached(text) => {
            reply.response = text;
            reply.cached = true;
        }
        Outcome::Failed { text, tag, model } => {
            reply.response = text;
            reply.error = Some(tag.to_string());
            reply.model = model;
        }
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_missing_fields() {
        let err = validate(&ChatRequest::new("  ", "", "ramayana")).err().unwrap();
        assert_eq!(err.to_string(), "Invalid request: Required fields: message, category");
    }

    #[test]
    fn validation_checks_the_catalog() {
        let bad_category = validate(&ChatRequest::new("hi", "tantras", "x")).err().unwrap();
        assert!(bad_category.to_string().contains("Invalid category: tantras"));

        let bad_topic = validate(&ChatRequest::new("hi", "epics", "shiva_purana")).err().unwrap();
        assert!(bad_topic.to_string().contains("Invalid topic: shiva_purana for category: epics"));

        let request = ChatRequest::new("  What is dharma?  ", " epics ", "gita");
        let ok = validate(&request).unwrap();
        assert_eq!(ok.message, "What is dharma?");
        assert_eq!(ok.category, "epics");
    }

    #[test]
    fn settings_follow_config() {
        let mut config = AppConfig::default();
        config.cache.enabled = false;
        config.prompts.topic_matching = TopicMatching::Strict;
        let settings = ChatSettings::from_config(&config);
        assert!(!settings.cache_enabled);
        assert_eq!(settings.topic_matching, TopicMatching::Strict);
    }
}
