//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with DTOs, handlers and routes; `router`
//! merges them under the shared middleware stack.

pub mod auth;
pub mod chat;
pub mod error;
pub mod middleware;
mod router;

pub use auth::{auth_routes, AuthHandlers, CookieSettings};
pub use chat::{chat_routes, ChatHandlers};
pub use error::ErrorResponse;
pub use middleware::{AuthState, RequireAuth};
pub use router::{app_router, AppState, HttpSettings};
