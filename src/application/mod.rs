//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod diagnosis;
pub mod handlers;

pub use diagnosis::{DiagnosisError, DiagnosisGenerator};
pub use handlers::{
    ChatError, ChatSummary, EndChatCommand, EndChatHandler, ListChatsHandler, ListChatsQuery,
    LoginCommand, LoginHandler, SendMessageCommand, SendMessageHandler, SignupCommand,
    SignupHandler, StartChatCommand, StartChatHandler, TurnOutcome,
    GENERATION_UNAVAILABLE_MESSAGE,
};
