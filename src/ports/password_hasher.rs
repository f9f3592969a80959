//! Password hashing port.
//!
//! Hashes are self-describing strings (algorithm, parameters and salt
//! embedded), so `verify` needs nothing but the stored value.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from hashing or verification infrastructure.
///
/// A wrong password is not an error; `verify` returns `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
