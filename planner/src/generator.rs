//! Plan generators.
//!
//! The plan generator is the second opaque boundary: a structured prompt
//! (system instructions plus user message) in, natural-language itinerary
//! text out. `OpenAIGenerator` talks to the hosted chat API; tests
//! substitute stub implementations of [`PlanGenerator`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors from the plan generation boundary.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Generator not configured.
    #[error("plan generator not configured")]
    NotConfigured,

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// Invalid response from generator.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// External call exceeded its deadline.
    #[error("generation request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Request for generating a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instructions.
    pub system: String,

    /// User message.
    pub user: String,

    /// Model to use (generator-specific).
    pub model: Option<String>,

    /// Maximum tokens for the output.
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds; `None` uses the generator default.
    pub timeout_secs: Option<u64>,
}

impl GenerationRequest {
    /// Create a new generation request.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            model: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the output token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Trait for plan generators.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Get the name of this generator.
    fn name(&self) -> &str;

    /// Get the default model for this generator.
    fn default_model(&self) -> &str;

    /// Generate itinerary text from the given prompt.
    async fn generate(&self, request: GenerationRequest) -> Result<String>;

    /// Check if the generator is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// OpenAI chat-completions plan generator.
pub struct OpenAIGenerator {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Default model.
    default_model: String,

    /// Default output token budget.
    max_tokens: u32,

    /// Per-request timeout.
    timeout: Duration,
}

impl OpenAIGenerator {
    /// Create a new OpenAI generator.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            default_model: "gpt-4".to_string(),
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the default output token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OpenAIGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanGenerator for OpenAIGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(GeneratorError::NotConfigured)?;

        let model = request.model.unwrap_or_else(|| self.default_model.clone());
        let max_tokens = request.max_tokens.unwrap_or(self.max_tokens);
        let timeout = request
            .timeout_secs
            .map_or(self.timeout, Duration::from_secs);

        debug!("Generating plan with model: {model}");

        let body = serde_json::json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout {
                        secs: timeout.as_secs(),
                    }
                } else {
                    GeneratorError::Http(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(GeneratorError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: ChatCompletionResponse = response.json().await?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GeneratorError::InvalidResponse("No choices in response".to_string()))?;

        info!("Generated plan ({} chars)", content.len());
        Ok(content)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI chat API response format.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_generation_request_builder() {
        let request = GenerationRequest::new("system", "user")
            .with_model("gpt-4")
            .with_max_tokens(1024);

        assert_eq!(request.system, "system");
        assert_eq!(request.model, Some("gpt-4".to_string()));
        assert_eq!(request.max_tokens, Some(1024));
    }

    #[tokio::test]
    async fn test_generate_via_mock_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Day 1: walk the park."}}
                ]
            })))
            .mount(&server)
            .await;

        let generator = OpenAIGenerator::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let text = generator
            .generate(GenerationRequest::new("You are a travel agent.", "Plan a trip."))
            .await
            .unwrap();

        assert_eq!(text, "Day 1: walk the park.");
    }

    #[tokio::test]
    async fn test_generate_maps_rate_limit() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
            .mount(&server)
            .await;

        let generator = OpenAIGenerator::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let err = generator
            .generate(GenerationRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GeneratorError::RateLimited {
                retry_after_secs: 12
            }
        ));
    }

    #[tokio::test]
    async fn test_generate_maps_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "choices": [{"message": {"role": "assistant", "content": "late"}}]
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let generator = OpenAIGenerator::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(50));

        let err = generator
            .generate(GenerationRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, GeneratorError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_generate_empty_choices_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let generator = OpenAIGenerator::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let err = generator
            .generate(GenerationRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, GeneratorError::InvalidResponse(_)));
    }
}
