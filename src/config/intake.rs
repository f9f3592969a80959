//! Intake script configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::intake::{QuestionList, QuestionListError};

/// Intake configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeConfig {
    /// YAML file with the question list; the built-in list is used when unset
    pub questions_file: Option<PathBuf>,
}

impl IntakeConfig {
    /// Loads the configured question list.
    pub fn load_questions(&self) -> Result<QuestionList, QuestionListError> {
        match &self.questions_file {
            Some(path) => QuestionList::from_yaml_file(path),
            None => Ok(QuestionList::default()),
        }
    }
}
