//! Ollama Provider - Implementation of AIProvider for a local Ollama server.
//!
//! Uses the non-streaming `/api/generate` endpoint, which takes a single
//! prompt string. Reasoning models such as `deepseek-r1` include their
//! `<think>` trace in the returned text; stripping it is left to the caller.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OllamaConfig::new()
//!     .with_model("deepseek-r1:1.5b")
//!     .with_base_url("http://localhost:11434");
//!
//! let provider = OllamaProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{map_error_status, map_send_error, RetryPolicy};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Default local model.
pub const DEFAULT_OLLAMA_MODEL: &str = "deepseek-r1:1.5b";

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Configuration for the Ollama provider.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub temperature: Option<f32>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaConfig {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            timeout: Duration::from_secs(120),
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
}

/// Ollama API provider implementation.
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OllamaProvider {
    /// Creates a new provider.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: OllamaConfig) -> Result<Self, AIError> {
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

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    fn to_ollama_request(&self, request: &CompletionRequest) -> OllamaRequest {
        let temperature = request.temperature.or(self.config.temperature);
        let options = if temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        OllamaRequest {
            model: self.config.model.clone(),
            prompt: request.flattened_prompt(),
            stream: false,
            options,
        }
    }

    async fn send_once(&self, body: &OllamaRequest) -> Result<CompletionResponse, AIError> {
        let response = self
            .client
            .post(self.generate_url())
            .json(body)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, error_body));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Ok(parsed.into_completion())
    }
}

#[async_trait]
impl AIProvider for OllamaProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.to_ollama_request(&request);
        tracing::debug!(
            model = %self.config.model,
            trace_id = %request.metadata.trace_id,
            "Sending Ollama generate request"
        );
        self.retry.run(|| self.send_once(&body)).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("ollama", &self.config.model, 32768)
    }
}

// ----- Ollama API Types -----

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl OllamaResponse {
    fn into_completion(self) -> CompletionResponse {
        let finish_reason = match self.done_reason.as_deref() {
            Some("length") => FinishReason::Length,
            _ => FinishReason::Stop,
        };

        CompletionResponse {
            content: self.response,
            usage: TokenUsage::new(
                self.prompt_eval_count.unwrap_or(0),
                self.eval_count.unwrap_or(0),
            ),
            model: self.model,
            finish_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChatId, UserId};
    use crate::ports::{MessageRole, RequestMetadata};

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            UserId::new("u").unwrap(),
            ChatId::new(),
            "trace",
        ))
        .with_message(MessageRole::User, "Patient reported symptoms: fever")
    }

    #[test]
    fn defaults_target_local_deepseek() {
        let config = OllamaConfig::default();
        assert_eq!(config.model, "deepseek-r1:1.5b");
        assert_eq!(config.base_url, "http://localhost:11434");
    }

    #[test]
    fn generate_url_tolerates_trailing_slash() {
        let provider =
            OllamaProvider::new(OllamaConfig::new().with_base_url("http://ollama:11434/")).unwrap();
        assert_eq!(provider.generate_url(), "http://ollama:11434/api/generate");
    }

    #[test]
    fn request_is_non_streaming_single_prompt() {
        let provider = OllamaProvider::new(OllamaConfig::new()).unwrap();
        let body = serde_json::to_value(provider.to_ollama_request(&request())).unwrap();

        assert_eq!(body["model"], "deepseek-r1:1.5b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["prompt"], "Patient reported symptoms: fever");
        assert!(body.get("options").is_none());
    }

    #[test]
    fn request_carries_configured_temperature() {
        let provider = OllamaProvider::new(OllamaConfig::new().with_temperature(0.2)).unwrap();
        let body = serde_json::to_value(provider.to_ollama_request(&request())).unwrap();

        let temp = body["options"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.2).abs() < 1e-6);
    }

    #[test]
    fn response_parses_text_and_usage() {
        let raw = r#"{"model":"deepseek-r1:1.5b","created_at":"2024-01-01T00:00:00Z",
            "response":"<think>hmm</think>Report","done":true,"done_reason":"stop",
            "prompt_eval_count":12,"eval_count":30}"#;
        let parsed: OllamaResponse = serde_json::from_str(raw).unwrap();
        let completion = parsed.into_completion();

        assert_eq!(completion.content, "<think>hmm</think>Report");
        assert_eq!(completion.usage.total_tokens, 42);
        assert_eq!(completion.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn provider_info_reports_ollama() {
        let provider = OllamaProvider::new(OllamaConfig::new()).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "ollama");
        assert_eq!(info.model, DEFAULT_OLLAMA_MODEL);
    }
}
