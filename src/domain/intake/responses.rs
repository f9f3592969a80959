//! Question/answer pairing.
//!
//! Pairing is positional: whatever message immediately follows a bot
//! message is taken as its answer, regardless of sender. Histories that do
//! not alternate are not rejected; they just pair oddly or fall back to the
//! placeholder.

use super::message::ChatMessage;

/// Answer recorded for a question that was the last message in history.
pub const NOT_ANSWERED: &str = "not answered";

/// Ordered mapping from question text to the answer that followed it.
///
/// Derived from history on demand and never persisted. A question text that
/// appears more than once keeps its first position and takes the latest
/// answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMap {
    entries: Vec<(String, String)>,
}

impl ResponseMap {
    /// Builds the map from a full chat history.
    pub fn from_history(history: &[ChatMessage]) -> Self {
        let mut map = Self::default();

        for (i, message) in history.iter().enumerate() {
            if !message.is_from_bot() {
                continue;
            }
            let answer = history
                .get(i + 1)
                .map(ChatMessage::text)
                .unwrap_or(NOT_ANSWERED);
            map.insert(message.text(), answer);
        }

        map
    }

    fn insert(&mut self, question: &str, answer: &str) {
        match self.entries.iter_mut().find(|(q, _)| q == question) {
            Some(entry) => entry.1 = answer.to_string(),
            None => self
                .entries
                .push((question.to_string(), answer.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    /// Pairs in first-asked order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Renders one `"<question> <answer>"` line per pair.
    pub fn to_lines(&self) -> String {
        self.pairs()
            .map(|(q, a)| format!("{} {}", q, a))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::intake::message::Sender;

    fn msg(sender: Sender, text: &str) -> ChatMessage {
        ChatMessage::new(sender, text, Timestamp::now())
    }

    #[test]
    fn pairs_each_question_with_following_message() {
        let history = vec![
            msg(Sender::User, "fever"),
            msg(Sender::Bot, "Q1"),
            msg(Sender::User, "3 days"),
            msg(Sender::Bot, "Q2"),
        ];

        let map = ResponseMap::from_history(&history);
        let pairs: Vec<_> = map.pairs().collect();
        assert_eq!(pairs, vec![("Q1", "3 days"), ("Q2", "not answered")]);
    }

    #[test]
    fn empty_history_gives_empty_map() {
        let map = ResponseMap::from_history(&[]);
        assert!(map.is_empty());
        assert_eq!(map.to_lines(), "");
    }

    #[test]
    fn consecutive_bot_messages_pair_with_each_other() {
        let history = vec![
            msg(Sender::Bot, "Q1"),
            msg(Sender::Bot, "Q2"),
            msg(Sender::User, "yes"),
        ];

        let map = ResponseMap::from_history(&history);
        assert_eq!(map.answer_for("Q1"), Some("Q2"));
        assert_eq!(map.answer_for("Q2"), Some("yes"));
    }

    #[test]
    fn repeated_question_keeps_position_and_latest_answer() {
        let history = vec![
            msg(Sender::User, "fever"),
            msg(Sender::Bot, "Q1"),
            msg(Sender::User, "2 days"),
            msg(Sender::Bot, "Q2"),
            msg(Sender::User, "cough"),
            msg(Sender::Bot, "Q1"),
            msg(Sender::User, "3 days"),
        ];

        let map = ResponseMap::from_history(&history);
        let pairs: Vec<_> = map.pairs().collect();
        assert_eq!(pairs, vec![("Q1", "3 days"), ("Q2", "cough")]);
    }

    #[test]
    fn lines_join_question_and_answer_with_space() {
        let history = vec![
            msg(Sender::Bot, "How long?"),
            msg(Sender::User, "3 days"),
            msg(Sender::Bot, "Other symptoms?"),
            msg(Sender::User, "cough"),
        ];

        let map = ResponseMap::from_history(&history);
        assert_eq!(map.to_lines(), "How long? 3 days\nOther symptoms? cough");
    }
}
