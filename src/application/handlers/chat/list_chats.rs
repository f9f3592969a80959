//! ListChatsHandler - the caller's ended chats with full histories.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::ChatError;
use crate::domain::foundation::{ChatId, UserId};
use crate::domain::intake::ChatMessage;
use crate::ports::{ChatRepository, UserRepository};

/// Upper bound on chats returned by one listing.
pub const MAX_LISTED_CHATS: usize = 100;

/// One ended chat as shown in the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub chat_id: ChatId,
    pub user: UserId,
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

/// Query for the caller's previous chats.
#[derive(Debug, Clone)]
pub struct ListChatsQuery {
    pub user_id: UserId,
}

pub struct ListChatsHandler {
    chats: Arc<dyn ChatRepository>,
    users: Arc<dyn UserRepository>,
}

impl ListChatsHandler {
    pub fn new(chats: Arc<dyn ChatRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { chats, users }
    }

    /// Lists ended chats in the order they were first ended.
    ///
    /// A chat ended more than once appears once, under the title it was
    /// first ended with. Chats that no longer exist are skipped.
    pub async fn handle(&self, query: ListChatsQuery) -> Result<Vec<ChatSummary>, ChatError> {
        let Some(account) = self.users.find_by_id(&query.user_id).await? else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let entries: Vec<_> = account
            .previous_chats()
            .iter()
            .filter(|e| seen.insert(e.chat_id))
            .collect();
        let ids: Vec<ChatId> = entries.iter().map(|e| e.chat_id).collect();

        let chats = self.chats.find_many(&ids, MAX_LISTED_CHATS).await?;

        let summaries = entries
            .into_iter()
            .filter_map(|entry| {
                let chat = chats.iter().find(|c| c.id() == &entry.chat_id)?;
                Some(ChatSummary {
                    chat_id: entry.chat_id,
                    user: chat.owner().clone(),
                    title: entry.title.clone(),
                    messages: chat.messages().to_vec(),
                })
            })
            .take(MAX_LISTED_CHATS)
            .collect();

        Ok(summaries)
    }
}
