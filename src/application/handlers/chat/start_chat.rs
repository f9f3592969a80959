//! StartChatHandler - creates an empty chat owned by the caller.

use std::sync::Arc;

use super::ChatError;
use crate::domain::chat::Chat;
use crate::domain::foundation::{ChatId, UserId};
use crate::ports::ChatRepository;

/// Command to start a new chat.
#[derive(Debug, Clone)]
pub struct StartChatCommand {
    pub user_id: UserId,
    pub title: Option<String>,
}

/// Handler for starting chats.
pub struct StartChatHandler {
    chats: Arc<dyn ChatRepository>,
}

impl StartChatHandler {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }

    pub async fn handle(&self, cmd: StartChatCommand) -> Result<Chat, ChatError> {
        let chat = Chat::start(ChatId::new(), cmd.user_id, cmd.title)?;
        self.chats.create(&chat).await?;

        tracing::info!(chat_id = %chat.id(), owner = %chat.owner(), "Chat started");
        Ok(chat)
    }
}
