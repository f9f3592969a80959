//! In-memory chat store.
//!
//! Used when no database is configured and throughout the tests. A single
//! write lock around the map linearizes appends per chat.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::Chat;
use crate::domain::foundation::{ChatId, DomainError, ErrorCode};
use crate::domain::intake::ChatMessage;
use crate::ports::ChatRepository;

fn chat_not_found(id: &ChatId) -> DomainError {
    DomainError::new(ErrorCode::ChatNotFound, "Chat not found").with_detail("chat_id", id.to_string())
}

/// In-memory storage for chats.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    chats: Arc<RwLock<HashMap<ChatId, Chat>>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chats (useful for tests).
    pub async fn chat_count(&self) -> usize {
        self.chats.read().await.len()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create(&self, chat: &Chat) -> Result<(), DomainError> {
        let mut chats = self.chats.write().await;
        if chats.contains_key(chat.id()) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                "Chat already exists",
            ));
        }
        chats.insert(*chat.id(), chat.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, DomainError> {
        Ok(self.chats.read().await.get(id).cloned())
    }

    async fn append_message(&self, id: &ChatId, message: &ChatMessage) -> Result<(), DomainError> {
        let mut chats = self.chats.write().await;
        let chat = chats.get_mut(id).ok_or_else(|| chat_not_found(id))?;
        chat.append(message.clone());
        Ok(())
    }

    async fn read_all(&self, id: &ChatId) -> Result<Vec<ChatMessage>, DomainError> {
        self.chats
            .read()
            .await
            .get(id)
            .map(|chat| chat.messages().to_vec())
            .ok_or_else(|| chat_not_found(id))
    }

    async fn find_many(&self, ids: &[ChatId], limit: usize) -> Result<Vec<Chat>, DomainError> {
        let chats = self.chats.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| chats.get(id).cloned())
            .take(limit)
            .collect())
    }
}
