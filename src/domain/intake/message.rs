//! Chat message entity.
//!
//! Messages are immutable records of user/bot exchanges within a chat.
//! Their position in the chat history is significant: the question
//! sequencer and the answer pairing both read history positionally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The patient typing into the chat.
    User,
    /// The intake bot (questions and diagnosis).
    Bot,
}

impl Sender {
    /// Wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(ValidationError::invalid_format(
                "sender",
                format!("unknown sender '{}'", other),
            )),
        }
    }
}

/// An immutable message within a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    sender: Sender,
    text: String,
    timestamp: Timestamp,
}

impl ChatMessage {
    /// Reconstitutes a message exactly as stored.
    pub fn new(sender: Sender, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
        }
    }

    /// Creates a user message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the text is blank
    pub fn user(text: impl Into<String>, timestamp: Timestamp) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(Self::new(Sender::User, text, timestamp))
    }

    /// Creates a bot message stamped with the current time.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text, Timestamp::now())
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Returns true when no two consecutive messages share a sender.
///
/// The intake flow never rejects a non-alternating history; this only
/// exists so callers can log when pairing is about to degrade.
pub fn is_alternating(history: &[ChatMessage]) -> bool {
    history
        .windows(2)
        .all(|pair| pair[0].sender() != pair[1].sender())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn sender_parses_known_values() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("bot".parse::<Sender>().unwrap(), Sender::Bot);
        assert!("assistant".parse::<Sender>().is_err());
    }

    #[test]
    fn user_message_rejects_blank_text() {
        assert!(ChatMessage::user("", Timestamp::now()).is_err());
        assert!(ChatMessage::user("  \n\t", Timestamp::now()).is_err());
    }

    #[test]
    fn user_message_keeps_text_verbatim() {
        let msg = ChatMessage::user("  fever  ", Timestamp::now()).unwrap();
        assert_eq!(msg.text(), "  fever  ");
        assert!(msg.is_from_user());
    }

    #[test]
    fn bot_message_is_from_bot() {
        let msg = ChatMessage::bot("How long?");
        assert!(msg.is_from_bot());
        assert_eq!(msg.sender(), Sender::Bot);
    }

    #[test]
    fn alternation_detection() {
        let ts = Timestamp::now();
        let alternating = vec![
            ChatMessage::new(Sender::User, "a", ts),
            ChatMessage::new(Sender::Bot, "b", ts),
            ChatMessage::new(Sender::User, "c", ts),
        ];
        assert!(is_alternating(&alternating));

        let doubled = vec![
            ChatMessage::new(Sender::User, "a", ts),
            ChatMessage::new(Sender::Bot, "b", ts),
            ChatMessage::new(Sender::Bot, "c", ts),
        ];
        assert!(!is_alternating(&doubled));
        assert!(is_alternating(&[]));
    }
}
