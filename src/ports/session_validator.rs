//! Session ports for access tokens.
//!
//! `TokenIssuer` mints a token for a user after signup or login;
//! `SessionValidator` turns a presented token back into an
//! `AuthenticatedUser`. Both are implemented by the same HS256 JWT adapter
//! in production and by a mock in tests.
//!
//! # Contract
//!
//! Validators must:
//! - Verify the token signature
//! - Reject expired tokens with `AuthError::TokenExpired`
//! - Return `AuthError::InvalidToken` for malformed/bad signature tokens
//! - Return `AuthError::UserNotFound` when the subject no longer exists
//! - Return `AuthError::ServiceUnavailable` for transient errors

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};

/// A freshly minted access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The encoded token, as placed in the cookie.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: Timestamp,
}

/// Mints access tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token whose subject is `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<IssuedToken, AuthError>;
}

/// Validates access tokens and extracts user identity.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw access token (without "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
