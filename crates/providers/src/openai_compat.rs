//! OpenAI-compatible provider implementation.
//!
//! Mistral and Perplexity both expose an OpenAI-style
//! `/chat/completions` endpoint, so one client serves both families.
//!
//! One `complete()` call is exactly one HTTP attempt. HTTP statuses are
//! mapped onto [`ProviderError`] variants so the retry loop can tell
//! transient failures from permanent ones.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vedaguru_core::error::ProviderError;
use vedaguru_core::message::Message;
use vedaguru_core::provider::*;

/// Citations are only appended to answers shorter than this (in chars).
const SOURCES_MAX_CONTENT_CHARS: usize = 1500;
const MAX_CITATIONS: usize = 5;

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    family: ProviderFamily,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(family: ProviderFamily, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: family.as_str().to_string(),
            family,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Mistral's public endpoint.
    pub fn mistral(api_key: impl Into<String>) -> Self {
        Self::new(ProviderFamily::Mistral, ProviderFamily::Mistral.default_base_url(), api_key)
    }

    /// Perplexity's public endpoint.
    pub fn perplexity(api_key: impl Into<String>) -> Self {
        Self::new(ProviderFamily::Perplexity, ProviderFamily::Perplexity.default_base_url(), api_key)
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().into(),
                content: m.content.clone(),
            })
            .collect()
    }

    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.sampling.temperature,
            "max_tokens": request.sampling.max_tokens,
            "top_p": request.sampling.top_p,
            "presence_penalty": request.sampling.presence_penalty,
            "frequency_penalty": request.sampling.frequency_penalty,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            for (key, value) in &request.extra {
                obj.insert(key.clone(), value.clone());
            }
        }

        body
    }
}

/// Map a transport failure onto the retry taxonomy.
fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// `Retry-After` in whole seconds. HTTP-date values are ignored.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let raw = headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(|s| s.ceil() as u64)
        })
}

/// Append a numbered `**Sources:**` list to short answers.
pub fn with_sources(content: String, citations: &[String]) -> String {
    if citations.is_empty() || content.chars().count() >= SOURCES_MAX_CONTENT_CHARS {
        return content;
    }
    let mut out = content;
    out.push_str("\n\n**Sources:**\n");
    for (i, citation) in citations.iter().take(MAX_CITATIONS).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, citation));
    }
    out
}

#[async_trait]
impl vedaguru_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> ProviderFamily {
        self.family
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::request_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: parse_retry_after(response.headers()),
            });
        }

        if status == 401 || status == 403 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed {
                status_code: status,
                message: error_body,
            });
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::InvalidResponse(format!("Failed to parse response: {e}"))
            }
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

        let mut citations = api_response.citations.unwrap_or_default();
        citations.truncate(MAX_CITATIONS);
        if !citations.is_empty() {
            debug!(provider = %self.name, count = citations.len(), "Provider returned citations");
        }

        let content = with_sources(choice.message.content.unwrap_or_default(), &citations);

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ProviderResponse {
            content,
            usage,
            model: api_response.model.unwrap_or(request.model),
            citations,
        })
    }
}

// --- OpenAI API types ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    citations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use vedaguru_core::Provider;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(extra: serde_json::Map<String, serde_json::Value>) -> ProviderRequest {
        ProviderRequest {
            model: "mistral-small-latest".into(),
            messages: vec![Message::system("You are Veda Jnana"), Message::user("What is rita?")],
            sampling: SamplingParams {
                temperature: 0.68,
                max_tokens: 800,
                top_p: 0.85,
                presence_penalty: 0.1,
                frequency_penalty: 0.5,
            },
            extra,
            timeout: Duration::from_secs(5),
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "cmpl-1",
            "object": "chat.completion",
            "model": "mistral-small-latest",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        })
    }

    #[test]
    fn constructors_use_public_endpoints() {
        let provider = OpenAiCompatProvider::mistral("sk-test");
        assert_eq!(provider.name(), "mistral");
        assert_eq!(provider.base_url, "https://api.mistral.ai/v1");

        let provider = OpenAiCompatProvider::perplexity("pplx-test");
        assert_eq!(provider.family(), ProviderFamily::Perplexity);
        assert!(provider.base_url.contains("api.perplexity.ai"));
    }

    #[test]
    fn request_body_carries_sampling_and_extras() {
        let mut extra = serde_json::Map::new();
        extra.insert("response_format".into(), json!({"type": "text"}));
        let body = OpenAiCompatProvider::request_body(&request(extra));

        assert_eq!(body["model"], "mistral-small-latest");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "What is rita?");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["stream"], false);
        assert_eq!(body["response_format"]["type"], "text");
        assert!(body.get("presence_penalty").is_some());
    }

    #[test]
    fn retry_after_parsing() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(reqwest::header::RETRY_AFTER, "2".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(2));
        headers.insert(reqwest::header::RETRY_AFTER, "1.5".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(2));
        headers.insert(reqwest::header::RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn sources_are_appended_to_short_answers_only() {
        let citations: Vec<String> = (1..=7).map(|i| format!("https://example.org/{i}")).collect();

        let short = with_sources("Answer.".into(), &citations);
        assert!(short.contains("\n\n**Sources:**\n1. https://example.org/1\n"));
        assert!(short.contains("5. https://example.org/5\n"));
        assert!(!short.contains("example.org/6"));

        let long = "x".repeat(1500);
        assert_eq!(with_sources(long.clone(), &citations), long);
        assert_eq!(with_sources("Answer.".into(), &[]), "Answer.");
    }

    #[tokio::test]
    async fn successful_completion_parses_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "mistral-small-latest", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ॐ शांति: Rita is cosmic order.")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, server.uri(), "sk-test");
        let response = provider.complete(request(Default::default())).await.unwrap();

        assert_eq!(response.content, "ॐ शांति: Rita is cosmic order.");
        assert_eq!(response.model, "mistral-small-latest");
        let usage = response.usage.unwrap();
        assert_eq!(usage.total_tokens, 160);
        assert!(response.citations.is_empty());
    }

    #[tokio::test]
    async fn perplexity_citations_are_returned_and_listed() {
        let server = MockServer::start().await;
        let mut body = completion("Short answer.");
        body["citations"] = json!(["https://a.example", "https://b.example"]);
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"return_citations": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Perplexity, server.uri(), "pplx");
        let mut extra = serde_json::Map::new();
        extra.insert("return_citations".into(), json!(true));
        let response = provider.complete(request(extra)).await.unwrap();

        assert_eq!(response.citations, ["https://a.example", "https://b.example"]);
        assert!(response.content.starts_with("Short answer.\n\n**Sources:**\n1. https://a.example"));
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, server.uri(), "sk-test");
        let err = provider.complete(request(Default::default())).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { retry_after_secs: Some(2) }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn unauthorized_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, server.uri(), "bad");
        let err = provider.complete(request(Default::default())).await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed { status_code: 401, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn server_errors_are_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, server.uri(), "sk-test");
        let err = provider.complete(request(Default::default())).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, server.uri(), "sk-test");
        let err = provider.complete(request(Default::default())).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, server.uri(), "sk-test");
        let mut req = request(Default::default());
        req.timeout = Duration::from_millis(50);
        let err = provider.complete(req).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_error() {
        let provider = OpenAiCompatProvider::new(ProviderFamily::Mistral, "http://127.0.0.1:1", "sk-test");
        let err = provider.complete(request(Default::default())).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
