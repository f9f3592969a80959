//! In-memory adapters.
//!
//! Back the chat and account ports when no database is configured, and in
//! tests.

mod chat_repository;
mod user_repository;

pub use chat_repository::InMemoryChatRepository;
pub use user_repository::InMemoryUserRepository;
