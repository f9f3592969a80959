//! OpenAI Provider - Implementation of AIProvider for OpenAI-compatible
//! chat completion APIs.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` contract (vLLM, LM Studio, hosted gateways).
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{map_error_status, map_send_error, RetryPolicy};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Sampling temperature used when the request sets none.
    pub temperature: Option<f32>,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;
        let retry = RetryPolicy::new(config.max_retries);

        Ok(Self {
            config,
            client,
            retry,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature.or(self.config.temperature),
        }
    }

    async fn send_once(&self, body: &OpenAIRequest) -> Result<CompletionResponse, AIError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(body)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, error_body));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        openai_response.into_completion()
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.to_openai_request(&request);
        tracing::debug!(
            model = %self.config.model,
            trace_id = %request.metadata.trace_id,
            "Sending chat completion request"
        );
        self.retry.run(|| self.send_once(&body)).await
    }

    fn provider_info(&self) -> ProviderInfo {
        let max_context = match self.config.model.as_str() {
            m if m.starts_with("gpt-4o") || m.starts_with("gpt-4-turbo") => 128000,
            m if m.starts_with("gpt-4") => 8192,
            m if m.starts_with("gpt-3.5") => 16384,
            _ => 32768,
        };

        ProviderInfo::new("openai", &self.config.model, max_context)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// Filtered completions come back with `content: null`.
#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

impl OpenAIResponse {
    fn into_completion(self) -> Result<CompletionResponse, AIError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };
        let content = choice.message.content.unwrap_or_default();

        if finish_reason == FinishReason::ContentFilter && content.trim().is_empty() {
            return Err(AIError::content_filtered(
                "completion withheld by the provider's content filter",
            ));
        }

        let usage = self
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: self.model,
            finish_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChatId, UserId};
    use crate::ports::RequestMetadata;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            UserId::new("u").unwrap(),
            ChatId::new(),
            "trace",
        ))
        .with_system_prompt("You are an AI doctor assistant.")
        .with_message(MessageRole::User, "Patient reported symptoms: fever")
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn request_puts_system_prompt_first() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k")).unwrap();
        let body = serde_json::to_value(provider.to_openai_request(&request())).unwrap();

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn response_takes_first_choice() {
        let raw = r#"{"model":"gpt-4o-mini","choices":[
            {"message":{"role":"assistant","content":"Report"},"finish_reason":"length"}],
            "usage":{"prompt_tokens":7,"completion_tokens":3}}"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let completion = parsed.into_completion().unwrap();

        assert_eq!(completion.content, "Report");
        assert_eq!(completion.finish_reason, FinishReason::Length);
        assert_eq!(completion.usage.total_tokens, 10);
    }

    #[test]
    fn filtered_empty_response_is_content_filtered() {
        let raw = r#"{"model":"gpt-4o-mini","choices":[
            {"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();

        let err = parsed.into_completion().unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn filtered_partial_response_keeps_content() {
        let raw = r#"{"model":"m","choices":[
            {"message":{"role":"assistant","content":"Partial"},"finish_reason":"content_filter"}]}"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let completion = parsed.into_completion().unwrap();

        assert_eq!(completion.content, "Partial");
        assert_eq!(completion.finish_reason, FinishReason::ContentFilter);
    }

    #[test]
    fn response_without_choices_is_parse_error() {
        let parsed: OpenAIResponse =
            serde_json::from_str(r#"{"model":"m","choices":[]}"#).unwrap();
        assert!(matches!(parsed.into_completion(), Err(AIError::Parse(_))));
    }

    #[test]
    fn provider_info_context_by_model() {
        let provider =
            OpenAIProvider::new(OpenAIConfig::new("k").with_model("gpt-4o-mini")).unwrap();
        assert_eq!(provider.provider_info().max_context_tokens, 128000);
        assert_eq!(provider.provider_info().name, "openai");
    }
}
