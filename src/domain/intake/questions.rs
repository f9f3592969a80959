//! The canonical intake question list.
//!
//! The list is data, not control flow: swapping it changes what the bot asks
//! without touching the sequencer. It is built once at startup (from the
//! built-in default or a YAML file) and shared read-only afterwards.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Built-in intake script, in asking order.
pub const DEFAULT_QUESTIONS: [&str; 4] = [
    "How long have you had these symptoms?",
    "Do you have any other symptoms? (e.g., chills, cough, nausea, sore throat, dizziness)?",
    "Have you noticed any breathing issues, chest pain, or fatigue?",
    "Any recent exposure to sick individuals or known infections?",
];

/// Errors raised while loading a question list from disk.
#[derive(Debug, Error)]
pub enum QuestionListError {
    #[error("Failed to read question file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse question file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid question list: {0}")]
    Invalid(#[from] ValidationError),
}

/// YAML layout: either a bare list or `{ questions: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    Bare(Vec<String>),
    Wrapped { questions: Vec<String> },
}

/// Fixed, ordered sequence of canonical questions.
///
/// # Invariants
///
/// - at least one question
/// - no blank entries
/// - no duplicate entries (a duplicate could never be "asked" separately)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionList {
    questions: Vec<String>,
}

impl QuestionList {
    /// Builds a validated list.
    pub fn new<I, S>(questions: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let questions: Vec<String> = questions.into_iter().map(Into::into).collect();

        if questions.is_empty() {
            return Err(ValidationError::empty_field("questions"));
        }

        for (i, question) in questions.iter().enumerate() {
            if question.trim().is_empty() {
                return Err(ValidationError::empty_field(format!("questions[{}]", i)));
            }
            if questions[..i].contains(question) {
                return Err(ValidationError::duplicate("questions", question.clone()));
            }
        }

        Ok(Self { questions })
    }

    /// Loads a list from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, QuestionListError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| QuestionListError::Io {
            path: display.clone(),
            source,
        })?;

        let parsed: QuestionFile =
            serde_yaml::from_str(&raw).map_err(|source| QuestionListError::Parse {
                path: display,
                source,
            })?;

        let questions = match parsed {
            QuestionFile::Bare(questions) => questions,
            QuestionFile::Wrapped { questions } => questions,
        };

        Ok(Self::new(questions)?)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.questions.iter().any(|q| q == text)
    }
}

impl Default for QuestionList {
    fn default() -> Self {
        Self {
            questions: DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }
}
