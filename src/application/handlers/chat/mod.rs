//! Chat command handlers.

mod end_chat;
mod errors;
mod list_chats;
mod send_message;
mod start_chat;

pub use end_chat::{EndChatCommand, EndChatHandler};
pub use errors::ChatError;
pub use list_chats::{ChatSummary, ListChatsHandler, ListChatsQuery, MAX_LISTED_CHATS};
pub use send_message::{
    SendMessageCommand, SendMessageHandler, TurnOutcome, GENERATION_UNAVAILABLE_MESSAGE,
};
pub use start_chat::{StartChatCommand, StartChatHandler};
