//! Mock AI Provider for testing and offline runs.
//!
//! Returns queued responses in order, then a canned diagnosis once the
//! queue is empty. Errors can be queued to exercise the unavailability path,
//! and every request is recorded for assertions.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("<think>...</think>Likely a viral infection.")
//!     .with_error(MockError::Unavailable { message: "down".into() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Text returned once the queue is exhausted.
pub const DEFAULT_MOCK_RESPONSE: &str = "Possible conditions: common viral infection.\n\
Medical reasoning: symptoms are mild and self-limiting.\n\
Recommended care: rest, fluids, and see a doctor if symptoms worsen.";

/// Mock AI provider.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success { content: String },
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 32768),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Success {
                content: content.into(),
            });
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: DEFAULT_MOCK_RESPONSE.to_string(),
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success { content } => Ok(CompletionResponse {
                usage: TokenUsage::new(10, (content.len() / 4) as u32),
                content,
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChatId, UserId};
    use crate::ports::{MessageRole, RequestMetadata};

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            UserId::new("test-user").unwrap(),
            ChatId::new(),
            "trace-123",
        ))
        .with_message(MessageRole::User, "Hello")
    }

    #[tokio::test]
    async fn returns_responses_in_order() {
        let provider = MockAIProvider::new().with_response("First").with_response("Second");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
        assert_eq!(r1.model, "mock-model-1");
    }

    #[tokio::test]
    async fn returns_default_after_exhausted() {
        let provider = MockAIProvider::new();
        let response = provider.complete(test_request()).await.unwrap();
        assert_eq!(response.content, DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });

        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn tracks_calls_across_clones() {
        let provider = MockAIProvider::new();
        let handle = provider.clone();

        provider.complete(test_request()).await.unwrap();

        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.get_calls()[0].metadata.trace_id, "trace-123");
    }
}
