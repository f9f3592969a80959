//! SendMessageHandler - one intake turn.
//!
//! A turn appends the user's message, reads the full history back, and
//! appends exactly one bot message: the next canonical question while any
//! remain, otherwise a diagnosis (or an apology if generation fails).
//!
//! Once concluded, every further user message produces a fresh diagnosis.

use std::sync::Arc;

use super::ChatError;
use crate::application::diagnosis::DiagnosisGenerator;
use crate::domain::foundation::{ChatId, Timestamp, UserId};
use crate::domain::intake::{
    is_alternating, ChatMessage, IntakeState, QuestionSequencer, ResponseMap, Sender,
};
use crate::ports::{ChatRepository, RequestMetadata};

/// Bot reply used when the diagnosis cannot be generated.
pub const GENERATION_UNAVAILABLE_MESSAGE: &str =
    "We're unable to generate a diagnosis right now. Please try again later.";

/// Command to send a user message into a chat.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub sender: Sender,
    pub text: String,
    /// Client-supplied send time; the server clock is used when absent.
    pub timestamp: Option<Timestamp>,
}

/// Result of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The bot message appended by this turn.
    pub bot_message: ChatMessage,
    /// Intake state after the bot message was appended.
    pub state: IntakeState,
}

/// Handler for intake turns.
#[derive(Clone)]
pub struct SendMessageHandler {
    chats: Arc<dyn ChatRepository>,
    sequencer: QuestionSequencer,
    diagnosis: DiagnosisGenerator,
}

impl SendMessageHandler {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        sequencer: QuestionSequencer,
        diagnosis: DiagnosisGenerator,
    ) -> Self {
        Self {
            chats,
            sequencer,
            diagnosis,
        }
    }

    /// Runs one turn.
    ///
    /// # Errors
    ///
    /// - `Validation` if the sender isn't `user` or the text is blank
    /// - `NotFound` if the chat doesn't exist
    /// - `Forbidden` if the chat belongs to someone else
    /// - `Infrastructure` on store failure
    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<TurnOutcome, ChatError> {
        if cmd.sender != Sender::User {
            return Err(ChatError::Validation(
                "only user messages can be sent".to_string(),
            ));
        }
        let user_message = ChatMessage::user(cmd.text, cmd.timestamp.unwrap_or_default())?;

        let chat = self
            .chats
            .find_by_id(&cmd.chat_id)
            .await?
            .ok_or(ChatError::NotFound)?;
        chat.authorize(&cmd.user_id)?;

        self.chats.append_message(&cmd.chat_id, &user_message).await?;
        let mut history = self.chats.read_all(&cmd.chat_id).await?;

        if !is_alternating(&history) {
            tracing::debug!(chat_id = %cmd.chat_id, "History does not alternate; answer pairing may degrade");
        }

        let bot_message = match self.sequencer.next_question(&history) {
            Some(question) => {
                tracing::debug!(chat_id = %cmd.chat_id, question, "Asking next intake question");
                ChatMessage::bot(question)
            }
            None => self.diagnose(&cmd.user_id, &cmd.chat_id, &history).await,
        };

        self.chats.append_message(&cmd.chat_id, &bot_message).await?;
        history.push(bot_message.clone());

        Ok(TurnOutcome {
            state: self.sequencer.state(&history),
            bot_message,
        })
    }

    async fn diagnose(&self, user_id: &UserId, chat_id: &ChatId, history: &[ChatMessage]) -> ChatMessage {
        let responses = ResponseMap::from_history(history);
        let chief_complaint = history
            .iter()
            .find(|m| m.is_from_user())
            .map(ChatMessage::text)
            .unwrap_or_default();
        let metadata = RequestMetadata::new(
            user_id.clone(),
            *chat_id,
            format!("diag-{}", uuid::Uuid::new_v4()),
        );

        match self.diagnosis.generate(chief_complaint, &responses, metadata).await {
            Ok(text) => {
                tracing::info!(chat_id = %chat_id, "Diagnosis delivered");
                ChatMessage::bot(text)
            }
            Err(e) => {
                tracing::warn!(chat_id = %chat_id, error = %e, "Diagnosis unavailable");
                ChatMessage::bot(GENERATION_UNAVAILABLE_MESSAGE)
            }
        }
    }
}
