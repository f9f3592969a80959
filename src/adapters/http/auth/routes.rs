//! HTTP routes for account endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth_check, login, logout, signup, AuthHandlers};

/// Creates the account router.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/auth/check", get(auth_check))
        .with_state(handlers)
}
