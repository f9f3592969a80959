//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{error_response, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::chat::{
    ChatError, EndChatCommand, EndChatHandler, ListChatsHandler, ListChatsQuery,
    SendMessageCommand, SendMessageHandler, StartChatCommand, StartChatHandler,
};
use crate::domain::foundation::ChatId;
use crate::domain::intake::Sender;

use super::dto::{
    ChatSummaryResponse, EndChatRequest, EndChatResponse, SaveChatRequest, SaveChatResponse,
    StartChatRequest, StartChatResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    start_handler: Arc<StartChatHandler>,
    send_handler: Arc<SendMessageHandler>,
    end_handler: Arc<EndChatHandler>,
    list_handler: Arc<ListChatsHandler>,
}

impl ChatHandlers {
    pub fn new(
        start_handler: Arc<StartChatHandler>,
        send_handler: Arc<SendMessageHandler>,
        end_handler: Arc<EndChatHandler>,
        list_handler: Arc<ListChatsHandler>,
    ) -> Self {
        Self {
            start_handler,
            send_handler,
            end_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /start_chat - Create an empty chat
pub async fn start_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<StartChatRequest>,
) -> Response {
    let cmd = StartChatCommand {
        user_id: user.id,
        title: req.title,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(chat) => Json(StartChatResponse {
            chat_id: chat.id().to_string(),
            title: chat.title().to_string(),
        })
        .into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// POST /save_chat - Run one intake turn
///
/// The turn runs on its own task: if the client goes away mid-diagnosis the
/// bot message is still generated and stored.
pub async fn save_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SaveChatRequest>,
) -> Response {
    let chat_id = match req.chat_id.parse::<ChatId>() {
        Ok(id) => id,
        Err(_) => return invalid_chat_id(),
    };
    let sender = match req.message.sender.parse::<Sender>() {
        Ok(sender) => sender,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(e.to_string()),
            )
        }
    };

    let cmd = SendMessageCommand {
        user_id: user.id,
        chat_id,
        sender,
        text: req.message.text,
        timestamp: req.message.timestamp,
    };

    let send_handler = Arc::clone(&handlers.send_handler);
    let turn = tokio::spawn(async move { send_handler.handle(cmd).await });

    match turn.await {
        Ok(Ok(outcome)) => Json(SaveChatResponse::from(outcome)).into_response(),
        Ok(Err(e)) => handle_chat_error(e),
        Err(join_error) => {
            tracing::error!(chat_id = %chat_id, error = %join_error, "Turn task failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::internal("Internal server error"),
            )
        }
    }
}

/// POST /end_chat - Record the chat in the caller's history
pub async fn end_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<EndChatRequest>,
) -> Response {
    let chat_id = match req.chat_id.parse::<ChatId>() {
        Ok(id) => id,
        Err(_) => return invalid_chat_id(),
    };

    let cmd = EndChatCommand {
        user_id: user.id,
        chat_id,
        title: req.title,
    };

    match handlers.end_handler.handle(cmd).await {
        Ok(entry) => Json(EndChatResponse {
            message: "Chat ended successfully".to_string(),
            chat_id: entry.chat_id.to_string(),
            title: entry.title,
        })
        .into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// GET /chats - List the caller's ended chats
pub async fn list_chats(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = ListChatsQuery { user_id: user.id };

    match handlers.list_handler.handle(query).await {
        Ok(chats) => {
            let response: Vec<ChatSummaryResponse> =
                chats.into_iter().map(ChatSummaryResponse::from).collect();
            Json(response).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn invalid_chat_id() -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::bad_request("Invalid chat ID"),
    )
}

fn handle_chat_error(error: ChatError) -> Response {
    match error {
        ChatError::NotFound => error_response(
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found("Chat not found"),
        ),
        ChatError::Forbidden => error_response(
            StatusCode::FORBIDDEN,
            ErrorResponse::forbidden("Permission denied"),
        ),
        ChatError::Validation(msg) => {
            error_response(StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
        }
        ChatError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Chat operation failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::internal("Internal server error"),
            )
        }
    }
}
