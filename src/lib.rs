//! Symptom Triage - fixed-script symptom intake with an LLM-written diagnosis.
//!
//! A chat walks the patient through a list of intake questions; once every
//! question has been asked, the collected answers are sent to a completion
//! model and its cleaned reply is posted as the final report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
