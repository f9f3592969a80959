//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OllamaProvider` - Local Ollama server (default, `deepseek-r1:1.5b`)
//! - `OpenAIProvider` - OpenAI-compatible chat completion APIs
//! - `MockAIProvider` - Configurable mock for tests and offline runs

mod mock_provider;
mod ollama_provider;
mod openai_provider;
mod retry;

pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_RESPONSE};
pub use ollama_provider::{OllamaConfig, OllamaProvider, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use retry::RetryPolicy;
