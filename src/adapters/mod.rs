//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (Ollama, OpenAI-compatible, mock)
//! - `auth` - JWT tokens and password hashing
//! - `http` - axum REST API
//! - `memory` - In-process stores for development and tests
//! - `postgres` - sqlx-backed stores

pub mod ai;
pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
