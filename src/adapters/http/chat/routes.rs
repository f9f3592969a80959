//! HTTP routes for chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{end_chat, list_chats, save_chat, start_chat, ChatHandlers};

/// Creates the chat router.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/start_chat", post(start_chat))
        .route("/save_chat", post(save_chat))
        .route("/end_chat", post(end_chat))
        .route("/chats", get(list_chats))
        .with_state(handlers)
}
