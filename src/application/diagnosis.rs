//! Diagnosis generation.
//!
//! Formats the intake answers into a prompt, calls the completion
//! collaborator once, and strips any reasoning trace from the reply. Every
//! provider failure collapses into `GenerationUnavailable`; the turn
//! controller turns that into a user-visible apology.
//!
//! The provider call, retries included, is bounded by an optional deadline.
//! It must sit below the HTTP request timeout so the apology reaches the
//! client before the request is cut off.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::intake::{build_diagnosis_prompt, strip_reasoning_trace, ResponseMap};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Errors from diagnosis generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosisError {
    #[error("Diagnosis generation unavailable: {0}")]
    GenerationUnavailable(String),
}

/// Produces the final diagnosis text for a completed intake.
#[derive(Clone)]
pub struct DiagnosisGenerator {
    provider: Arc<dyn AIProvider>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    deadline: Option<Duration>,
}

impl DiagnosisGenerator {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            max_tokens: None,
            deadline: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Upper bound on one generation, provider retries included.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Generates a cleaned diagnosis.
    ///
    /// # Errors
    ///
    /// - `GenerationUnavailable` if the provider fails, misses the
    ///   deadline, or returns nothing but reasoning trace
    pub async fn generate(
        &self,
        chief_complaint: &str,
        responses: &ResponseMap,
        metadata: RequestMetadata,
    ) -> Result<String, DiagnosisError> {
        let prompt = build_diagnosis_prompt(chief_complaint, responses);
        let mut request =
            CompletionRequest::new(metadata).with_message(MessageRole::User, prompt);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let info = self.provider.provider_info();
        tracing::info!(
            provider = %info.name,
            model = %info.model,
            answers = responses.len(),
            "Requesting diagnosis"
        );

        let call = self.provider.complete(request);
        let result = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        deadline_ms = deadline.as_millis() as u64,
                        "Diagnosis provider call missed its deadline"
                    );
                    return Err(DiagnosisError::GenerationUnavailable(format!(
                        "no completion within {}ms",
                        deadline.as_millis()
                    )));
                }
            },
            None => call.await,
        };

        let response = result.map_err(|e| {
            tracing::warn!(error = %e, "Diagnosis provider call failed");
            DiagnosisError::GenerationUnavailable(e.to_string())
        })?;

        let cleaned = strip_reasoning_trace(&response.content);
        if cleaned.is_empty() {
            return Err(DiagnosisError::GenerationUnavailable(
                "provider returned an empty diagnosis".to_string(),
            ));
        }

        tracing::debug!(
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Diagnosis generated"
        );
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::{ChatId, Timestamp, UserId};
    use crate::domain::intake::{ChatMessage, Sender};

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(UserId::new("u").unwrap(), ChatId::new(), "trace")
    }

    fn responses() -> ResponseMap {
        ResponseMap::from_history(&[
            ChatMessage::new(Sender::User, "fever", Timestamp::now()),
            ChatMessage::new(Sender::Bot, "How long?", Timestamp::now()),
            ChatMessage::new(Sender::User, "3 days", Timestamp::now()),
        ])
    }

    #[tokio::test]
    async fn strips_trace_from_provider_output() {
        let provider = MockAIProvider::new().with_response("<think>reasoning here</think>Final report text");
        let generator = DiagnosisGenerator::new(Arc::new(provider));

        let text = generator.generate("fever", &responses(), metadata()).await.unwrap();
        assert_eq!(text, "Final report text");
    }

    #[tokio::test]
    async fn sends_single_prompt_with_answers() {
        let provider = MockAIProvider::new().with_response("ok");
        let generator = DiagnosisGenerator::new(Arc::new(provider.clone()))
            .with_temperature(0.3)
            .with_max_tokens(512);

        generator.generate("fever", &responses(), metadata()).await.unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages.len(), 1);
        assert_eq!(calls[0].temperature, Some(0.3));
        assert_eq!(calls[0].max_tokens, Some(512));
        let prompt = &calls[0].messages[0].content;
        assert!(prompt.contains("Patient reported symptoms: fever"));
        assert!(prompt.contains("How long? 3 days"));
    }

    #[tokio::test]
    async fn provider_error_is_generation_unavailable() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "connection refused".into(),
        });
        let generator = DiagnosisGenerator::new(Arc::new(provider));

        let err = generator.generate("fever", &responses(), metadata()).await.unwrap_err();
        assert!(matches!(err, DiagnosisError::GenerationUnavailable(_)));
    }

    #[tokio::test]
    async fn trace_only_output_is_generation_unavailable() {
        let provider = MockAIProvider::new().with_response("<think>only thoughts</think>  ");
        let generator = DiagnosisGenerator::new(Arc::new(provider));

        let result = generator.generate("fever", &responses(), metadata()).await;
        assert!(matches!(result, Err(DiagnosisError::GenerationUnavailable(_))));
    }

    #[tokio::test]
    async fn slow_provider_past_deadline_is_generation_unavailable() {
        let provider = MockAIProvider::new()
            .with_delay(Duration::from_secs(5))
            .with_response("too late");
        let generator =
            DiagnosisGenerator::new(Arc::new(provider)).with_deadline(Duration::from_millis(50));

        let result = generator.generate("fever", &responses(), metadata()).await;
        assert!(matches!(result, Err(DiagnosisError::GenerationUnavailable(_))));
    }

    #[tokio::test]
    async fn provider_within_deadline_succeeds() {
        let provider = MockAIProvider::new()
            .with_delay(Duration::from_millis(10))
            .with_response("Report");
        let generator =
            DiagnosisGenerator::new(Arc::new(provider)).with_deadline(Duration::from_secs(5));

        let text = generator.generate("fever", &responses(), metadata()).await.unwrap();
        assert_eq!(text, "Report");
    }
}
