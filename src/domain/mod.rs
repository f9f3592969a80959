//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `intake` - Question list, sequencer, answer pairing, diagnosis prompt
//! - `chat` - Chat aggregate and ownership
//! - `account` - User accounts and their previous chats

pub mod account;
pub mod chat;
pub mod foundation;
pub mod intake;
