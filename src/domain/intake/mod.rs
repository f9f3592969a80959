//! Intake module - the fixed-script symptom questionnaire.
//!
//! Everything here is pure: the sequencer, the answer pairing and the
//! diagnosis prompt only read chat history and never perform I/O.

mod diagnosis;
mod message;
mod questions;
mod responses;
mod sequencer;

pub use diagnosis::{build_diagnosis_prompt, strip_reasoning_trace, DIAGNOSIS_PREAMBLE};
pub use message::{is_alternating, ChatMessage, Sender};
pub use questions::{QuestionList, QuestionListError, DEFAULT_QUESTIONS};
pub use responses::{ResponseMap, NOT_ANSWERED};
pub use sequencer::{IntakeState, QuestionSequencer};
