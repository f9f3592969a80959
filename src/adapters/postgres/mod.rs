//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresChatRepository` - Chats and ordered chat history
//! - `PostgresUserRepository` - Accounts and previous chats
//!
//! Schema lives in `migrations/` and is applied at startup with
//! `sqlx::migrate!` when `database.run_migrations` is set.

mod chat_repository;
mod rows;
mod user_repository;

pub use chat_repository::PostgresChatRepository;
pub use user_repository::PostgresUserRepository;
