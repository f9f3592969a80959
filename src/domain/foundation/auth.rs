//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the HTTP middleware injects into request
//! extensions once an access token has been validated. It has no dependency
//! on the token format; any `SessionValidator` adapter can populate it.

use super::UserId;
use thiserror::Error;

/// Authenticated user resolved from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The account identifier (JWT `sub` claim).
    pub id: UserId,

    /// Account email address.
    pub email: String,

    /// Display name given at signup.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the account no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// A token could not be minted.
    #[error("Token issuance failed: {0}")]
    IssuanceFailed(String),

    /// The account store could not be reached while resolving the user.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should log in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound
        )
    }
}
