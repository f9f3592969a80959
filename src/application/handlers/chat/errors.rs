//! Errors shared by the chat command handlers.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors that can occur while handling chat commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The chat does not exist.
    #[error("Chat not found")]
    NotFound,

    /// The chat belongs to another user.
    #[error("Forbidden: user does not own this chat")]
    Forbidden,

    /// The request was malformed (empty text, wrong sender, bad title).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store could not be reached or failed.
    #[error("Repository error: {0}")]
    Infrastructure(String),
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ChatNotFound => ChatError::NotFound,
            ErrorCode::Forbidden => ChatError::Forbidden,
            ErrorCode::ValidationFailed => ChatError::Validation(err.message),
            _ => ChatError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for ChatError {
    fn from(err: ValidationError) -> Self {
        ChatError::Validation(err.to_string())
    }
}
