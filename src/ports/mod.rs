//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `ChatRepository` - Chats and their ordered message histories
//! - `UserRepository` - Accounts and their previous chats
//!
//! ## Collaborator Ports
//!
//! - `AIProvider` - Text completion used for the diagnosis
//! - `PasswordHasher` - Password hashing and verification
//! - `TokenIssuer` / `SessionValidator` - Access token minting and validation

mod ai_provider;
mod chat_repository;
mod password_hasher;
mod session_validator;
mod user_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use chat_repository::ChatRepository;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use session_validator::{IssuedToken, SessionValidator, TokenIssuer};
pub use user_repository::UserRepository;
