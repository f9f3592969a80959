//! HTTP DTOs for chat endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::chat::{ChatSummary, TurnOutcome};
use crate::domain::foundation::Timestamp;
use crate::domain::intake::{ChatMessage, IntakeState};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a chat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Incoming message payload.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// Parsed by the handler so an unknown sender is a 400
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

/// Request to send one message into a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveChatRequest {
    pub chat_id: String,
    pub message: IncomingMessage,
}

/// Request to end a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct EndChatRequest {
    pub chat_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct StartChatResponse {
    pub chat_id: String,
    pub title: String,
}

/// A message as rendered to clients.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub sender: String,
    pub text: String,
    pub timestamp: String,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            sender: message.sender().to_string(),
            text: message.text().to_string(),
            timestamp: message.timestamp().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveChatResponse {
    pub message: String,
    pub llm_response: MessageView,
    pub state: IntakeState,
}

impl From<TurnOutcome> for SaveChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            message: "Message saved successfully".to_string(),
            llm_response: MessageView::from(&outcome.bot_message),
            state: outcome.state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EndChatResponse {
    pub message: String,
    pub chat_id: String,
    pub title: String,
}

/// One entry of `GET /chats`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummaryResponse {
    pub chat_id: String,
    pub user: String,
    pub title: String,
    pub messages: Vec<MessageView>,
}

impl From<ChatSummary> for ChatSummaryResponse {
    fn from(summary: ChatSummary) -> Self {
        Self {
            chat_id: summary.chat_id.to_string(),
            user: summary.user.to_string(),
            title: summary.title,
            messages: summary.messages.iter().map(MessageView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_chat_request_accepts_missing_timestamp() {
        let req: SaveChatRequest = serde_json::from_value(serde_json::json!({
            "chat_id": "abc",
            "message": {"sender": "user", "text": "fever"}
        }))
        .unwrap();
        assert!(req.message.timestamp.is_none());
    }

    #[test]
    fn save_chat_request_parses_rfc3339_timestamp() {
        let req: SaveChatRequest = serde_json::from_value(serde_json::json!({
            "chat_id": "abc",
            "message": {"sender": "user", "text": "fever", "timestamp": "2024-05-01T10:00:00Z"}
        }))
        .unwrap();
        assert_eq!(
            req.message.timestamp.map(|t| t.as_unix_secs()),
            Some(1_714_557_600)
        );
    }

    #[test]
    fn save_chat_response_shape() {
        let outcome = TurnOutcome {
            bot_message: ChatMessage::bot("How long?"),
            state: IntakeState::Collecting { asked: 1, total: 4 },
        };
        let json = serde_json::to_value(SaveChatResponse::from(outcome)).unwrap();
        assert_eq!(json["message"], "Message saved successfully");
        assert_eq!(json["llm_response"]["sender"], "bot");
        assert_eq!(json["llm_response"]["text"], "How long?");
        assert_eq!(json["state"]["phase"], "collecting");
    }
}
