//! Mock authentication adapters for testing.
//!
//! `MockSessionValidator` accepts a fixed set of tokens without any
//! cryptography. `MockPasswordHasher` stores passwords behind a marker
//! prefix so tests avoid the cost of real Argon2 rounds.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_test_user("valid-token", "user-123");
//! let user = validator.validate("valid-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{PasswordHashError, PasswordHasher, SessionValidator};

/// Mock session validator for testing.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Adds a valid token with a simple test user.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(&user_id).unwrap(),
            format!("{}@test.example.com", user_id),
            Some(format!("Test User {}", user_id)),
        );
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

const MOCK_HASH_PREFIX: &str = "mock$";

/// Non-cryptographic hasher for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPasswordHasher;

#[async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{}{}", MOCK_HASH_PREFIX, password))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let stored = hash
            .strip_prefix(MOCK_HASH_PREFIX)
            .ok_or_else(|| PasswordHashError::MalformedHash("missing mock prefix".into()))?;
        Ok(stored == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_validator_accepts_registered_token() {
        let validator = MockSessionValidator::new().with_test_user("token-1", "user-1");
        let user = validator.validate("token-1").await.unwrap();
        assert_eq!(user.id.as_str(), "user-1");
        assert_eq!(user.email, "user-1@test.example.com");
    }

    #[tokio::test]
    async fn mock_validator_rejects_unknown_token() {
        let validator = MockSessionValidator::new();
        assert_eq!(
            validator.validate("nope").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn mock_validator_forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_test_user("token-1", "user-1")
            .with_error(AuthError::TokenExpired);
        assert_eq!(
            validator.validate("token-1").await.unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[tokio::test]
    async fn mock_hasher_round_trips() {
        let hasher = MockPasswordHasher;
        let hash = hasher.hash("secret").await.unwrap();
        assert!(hasher.verify("secret", &hash).await.unwrap());
        assert!(!hasher.verify("other", &hash).await.unwrap());
    }
}
