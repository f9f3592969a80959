//! Question sequencing.
//!
//! Decides, from chat history alone, whether the bot still has a canonical
//! question to ask or whether the intake is over. A question counts as
//! answered once its exact text has been sent by the bot; whether the user's
//! reply was useful is irrelevant here.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::message::ChatMessage;
use super::questions::QuestionList;

/// Where a chat stands in the intake script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum IntakeState {
    /// Some canonical question has not been asked yet.
    Collecting {
        /// Distinct canonical questions already asked.
        asked: usize,
        /// Size of the question list.
        total: usize,
    },
    /// Every canonical question has been asked; the next turn diagnoses.
    Concluded,
}

impl IntakeState {
    pub fn is_concluded(&self) -> bool {
        matches!(self, IntakeState::Concluded)
    }
}

/// Walks the question list against a chat history.
///
/// Pure: the same history always yields the same answer, and nothing is
/// read or written outside the arguments.
#[derive(Debug, Clone)]
pub struct QuestionSequencer {
    questions: Arc<QuestionList>,
}

impl QuestionSequencer {
    pub fn new(questions: Arc<QuestionList>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &QuestionList {
        &self.questions
    }

    /// Returns the first canonical question the bot has not sent yet, or
    /// `None` once all of them appear in history.
    ///
    /// Bot texts that are not canonical questions (diagnoses, renamed
    /// questions) are ignored. Repeats count once.
    pub fn next_question(&self, history: &[ChatMessage]) -> Option<&str> {
        let asked = asked_texts(history);
        self.questions.iter().find(|q| !asked.contains(q))
    }

    /// Derives the intake state for a history.
    pub fn state(&self, history: &[ChatMessage]) -> IntakeState {
        let asked = asked_texts(history);
        let asked_count = self.questions.iter().filter(|q| asked.contains(q)).count();

        if asked_count == self.questions.len() {
            IntakeState::Concluded
        } else {
            IntakeState::Collecting {
                asked: asked_count,
                total: self.questions.len(),
            }
        }
    }
}

/// Set of distinct texts the bot has sent.
fn asked_texts(history: &[ChatMessage]) -> HashSet<&str> {
    history
        .iter()
        .filter(|m| m.is_from_bot())
        .map(ChatMessage::text)
        .collect()
}
