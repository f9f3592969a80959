//! Chat repository port - the chat history store.
//!
//! Holds chats and their ordered message histories. Appends for a given
//! chat are linearized by the implementation so that concurrent turns never
//! interleave inside one message list.

use crate::domain::chat::Chat;
use crate::domain::foundation::{ChatId, DomainError};
use crate::domain::intake::ChatMessage;
use async_trait::async_trait;

/// Repository port for chats and their histories.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Save a new chat (with whatever messages it already holds).
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a chat with the same id exists
    /// - `DatabaseError` on persistence failure
    async fn create(&self, chat: &Chat) -> Result<(), DomainError>;

    /// Find a chat, including its full history.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, DomainError>;

    /// Append one message to the end of a chat's history.
    ///
    /// # Errors
    ///
    /// - `ChatNotFound` if the chat doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn append_message(&self, id: &ChatId, message: &ChatMessage) -> Result<(), DomainError>;

    /// Read a chat's full history in insertion order.
    ///
    /// # Errors
    ///
    /// - `ChatNotFound` if the chat doesn't exist
    async fn read_all(&self, id: &ChatId) -> Result<Vec<ChatMessage>, DomainError>;

    /// Load several chats at once, skipping ids that don't exist.
    ///
    /// Returns at most `limit` chats, in the order of `ids`.
    async fn find_many(&self, ids: &[ChatId], limit: usize) -> Result<Vec<Chat>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ChatRepository) {}
    }
}
