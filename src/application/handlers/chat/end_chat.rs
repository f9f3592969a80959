//! EndChatHandler - records a finished chat in the owner's history.

use std::sync::Arc;

use super::ChatError;
use crate::domain::account::ChatEntry;
use crate::domain::foundation::{ChatId, ErrorCode, UserId};
use crate::ports::{ChatRepository, UserRepository};

/// Command to end a chat.
#[derive(Debug, Clone)]
pub struct EndChatCommand {
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// Title to record; falls back to the chat's own title.
    pub title: Option<String>,
}

/// Handler for ending chats.
///
/// Ending is append-only: ending the same chat twice records it twice.
/// Messages are never touched.
pub struct EndChatHandler {
    chats: Arc<dyn ChatRepository>,
    users: Arc<dyn UserRepository>,
}

impl EndChatHandler {
    pub fn new(chats: Arc<dyn ChatRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { chats, users }
    }

    pub async fn handle(&self, cmd: EndChatCommand) -> Result<ChatEntry, ChatError> {
        let chat = self
            .chats
            .find_by_id(&cmd.chat_id)
            .await?
            .ok_or(ChatError::NotFound)?;
        chat.authorize(&cmd.user_id)?;

        let entry = ChatEntry::new(*chat.id(), chat.closing_title(cmd.title.as_deref()));
        self.users
            .add_previous_chat(&cmd.user_id, &entry)
            .await
            .map_err(|e| match e.code {
                ErrorCode::UserNotFound => ChatError::Forbidden,
                _ => ChatError::from(e),
            })?;

        tracing::info!(chat_id = %entry.chat_id, title = %entry.title, "Chat ended");
        Ok(entry)
    }
}
