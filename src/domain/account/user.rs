//! User account entity.
//!
//! An account owns a password hash and the list of chats the user has ended.
//! The hash is opaque here; producing and checking it is the job of the
//! `PasswordHasher` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Email;
use crate::domain::foundation::{ChatId, Timestamp, UserId, ValidationError};

/// An ended chat as listed on the user's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub chat_id: ChatId,
    pub title: String,
}

impl ChatEntry {
    pub fn new(chat_id: ChatId, title: impl Into<String>) -> Self {
        Self {
            chat_id,
            title: title.into(),
        }
    }
}

/// Errors raised by signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Account service unavailable: {0}")]
    Infrastructure(String),
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    name: String,
    email: Email,
    password_hash: String,
    previous_chats: Vec<ChatEntry>,
    created_at: Timestamp,
}

impl UserAccount {
    /// Registers a new account with an already hashed password.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name or hash is blank
    pub fn register(
        id: UserId,
        name: impl Into<String>,
        email: Email,
        password_hash: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let password_hash = password_hash.into();
        if password_hash.is_empty() {
            return Err(ValidationError::empty_field("password_hash"));
        }

        Ok(Self {
            id,
            name,
            email,
            password_hash,
            previous_chats: Vec::new(),
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute an account from persistence (no validation).
    pub fn reconstitute(
        id: UserId,
        name: String,
        email: Email,
        password_hash: String,
        previous_chats: Vec<ChatEntry>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            previous_chats,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Ended chats in the order they were ended.
    pub fn previous_chats(&self) -> &[ChatEntry] {
        &self.previous_chats
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Records an ended chat. Ending the same chat twice lists it twice.
    pub fn add_previous_chat(&mut self, entry: ChatEntry) {
        self.previous_chats.push(entry);
    }
}
