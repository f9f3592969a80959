//! Diagnosis prompt assembly and output cleanup.
//!
//! Both halves are pure string work; the completion call itself lives in
//! the application layer behind the `AIProvider` port.

use once_cell::sync::Lazy;
use regex::Regex;

use super::responses::ResponseMap;

/// Instructions placed before the patient data in every diagnosis prompt.
pub const DIAGNOSIS_PREAMBLE: &str = "You are an AI doctor assistant. Based on the patient's responses, \
analyze the symptoms and provide a structured final report.\n\
Include:\n\
1️⃣ Possible conditions.\n\
2️⃣ Medical reasoning.\n\
3️⃣ Recommended medications & care.";

/// Matches one reasoning span, shortest first, across newlines.
static REASONING_TRACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").expect("reasoning trace pattern is valid")
});

/// Builds the completion prompt for a finished intake.
pub fn build_diagnosis_prompt(chief_complaint: &str, responses: &ResponseMap) -> String {
    format!(
        "{}\n\nPatient reported symptoms: {}\n\nPatient's answers:\n{}",
        DIAGNOSIS_PREAMBLE,
        chief_complaint,
        responses.to_lines()
    )
}

/// Removes every complete `<think>...</think>` span and trims the result.
///
/// An opening marker without a matching close is left in place.
pub fn strip_reasoning_trace(raw: &str) -> String {
    REASONING_TRACE.replace_all(raw, "").trim().to_string()
}
