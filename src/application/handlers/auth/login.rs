//! LoginHandler - exchanges credentials for an access token.

use std::sync::Arc;

use crate::domain::account::{AccountError, Email};
use crate::ports::{IssuedToken, PasswordHasher, TokenIssuer, UserRepository};

/// Command to log in.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Handler for logins.
///
/// Unknown email, malformed email and wrong password all yield the same
/// `InvalidCredentials` error.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<IssuedToken, AccountError> {
        let email = Email::new(&cmd.email).map_err(|_| AccountError::InvalidCredentials)?;

        let account = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AccountError::Infrastructure(e.to_string()))?
            .ok_or(AccountError::InvalidCredentials)?;

        let matches = self
            .hasher
            .verify(&cmd.password, account.password_hash())
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %account.id(), error = %e, "Stored password hash rejected");
                AccountError::InvalidCredentials
            })?;
        if !matches {
            tracing::debug!(user_id = %account.id(), "Login with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(account.id())
            .map_err(|e| AccountError::Infrastructure(e.to_string()))?;

        tracing::info!(user_id = %account.id(), "User logged in");
        Ok(token)
    }
}
