//! HTTP adapter for intake chats.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatSummaryResponse, EndChatRequest, EndChatResponse, IncomingMessage, MessageView,
    SaveChatRequest, SaveChatResponse, StartChatRequest, StartChatResponse,
};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
