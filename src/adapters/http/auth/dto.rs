//! HTTP DTOs for account endpoints.

use serde::{Deserialize, Serialize};

/// Request to create an account.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response for `GET /auth/check`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthCheckResponse {
    pub message: String,
    pub user_id: String,
}
