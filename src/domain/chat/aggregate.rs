//! Chat aggregate.
//!
//! A chat is one intake conversation owned by one user. Its history is
//! append-only; ordering is insertion order and is what the sequencer reads.

use crate::domain::foundation::{ChatId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::intake::ChatMessage;

/// Title given to chats started without one.
pub const DEFAULT_CHAT_TITLE: &str = "Chat";

/// Title used when a chat is ended without any title at all.
pub const UNTITLED_CHAT_TITLE: &str = "Untitled Chat";

/// Maximum length for a chat title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Chat aggregate - one intake conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `title` is 1-200 characters, non-blank
/// - `messages` only grows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    id: ChatId,
    owner: UserId,
    title: String,
    messages: Vec<ChatMessage>,
    created_at: Timestamp,
}

impl Chat {
    /// Starts an empty chat. A missing or blank title becomes `"Chat"`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is too long
    pub fn start(id: ChatId, owner: UserId, title: Option<String>) -> Result<Self, DomainError> {
        let title = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => DEFAULT_CHAT_TITLE.to_string(),
        };
        Self::validate_title(&title)?;

        Ok(Self {
            id,
            owner,
            title,
            messages: Vec::new(),
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute a chat from persistence (no validation).
    pub fn reconstitute(
        id: ChatId,
        owner: UserId,
        title: String,
        messages: Vec<ChatMessage>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            messages,
            created_at,
        }
    }

    pub fn id(&self) -> &ChatId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Consumes the chat, yielding its history.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Checks if the given user owns this chat.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }

    /// Validates that the user can access this chat.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if user is not the owner
    pub fn authorize(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User is not authorized to access this chat",
            ))
        }
    }

    /// Appends a message to the end of history.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Picks the title to record when the chat ends: the requested one,
    /// else the chat's own, else `"Untitled Chat"`.
    pub fn closing_title(&self, requested: Option<&str>) -> String {
        requested
            .filter(|t| !t.trim().is_empty())
            .or(Some(self.title.as_str()).filter(|t| !t.trim().is_empty()))
            .unwrap_or(UNTITLED_CHAT_TITLE)
            .to_string()
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Title must be at most {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }
}
