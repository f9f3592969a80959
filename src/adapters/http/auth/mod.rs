//! HTTP adapter for signup, login and session cookies.

mod dto;
mod handlers;
mod routes;

pub use dto::{AuthCheckResponse, LoginRequest, MessageResponse, SignupRequest};
pub use handlers::{AuthHandlers, CookieSettings};
pub use routes::auth_routes;
