//! AI provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider backs diagnosis generation
    #[serde(default)]
    pub provider: AiProvider,

    /// Provider base URL; each provider has its own default
    pub base_url: Option<String>,

    /// Model name; each provider has its own default
    pub model: Option<String>,

    /// API key (required for OpenAI)
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Cap on generated tokens per diagnosis
    pub max_tokens: Option<u32>,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAI,
    /// Canned responses, for local development without a model
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        match self.provider {
            AiProvider::OpenAI if !self.has_api_key() => {
                return Err(ValidationError::MissingRequired("AI__API_KEY"));
            }
            AiProvider::Mock if *environment == Environment::Production => {
                return Err(ValidationError::MockProviderInProduction);
            }
            _ => {}
        }

        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidAiBaseUrl(url.clone()));
            }
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.max_tokens == Some(0) {
            return Err(ValidationError::InvalidMaxTokens);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            base_url: None,
            model: None,
            api_key: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}
