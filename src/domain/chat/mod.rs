//! Chat module - intake conversations and their ownership.

mod aggregate;

pub use aggregate::{Chat, DEFAULT_CHAT_TITLE, MAX_TITLE_LENGTH, UNTITLED_CHAT_TITLE};
