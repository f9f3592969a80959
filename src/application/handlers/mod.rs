//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod auth;
pub mod chat;

pub use auth::{LoginCommand, LoginHandler, SignupCommand, SignupHandler};
pub use chat::{
    ChatError, ChatSummary, EndChatCommand, EndChatHandler, ListChatsHandler, ListChatsQuery,
    SendMessageCommand, SendMessageHandler, StartChatCommand, StartChatHandler, TurnOutcome,
    GENERATION_UNAVAILABLE_MESSAGE,
};
