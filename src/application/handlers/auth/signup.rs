//! SignupHandler - registers an account and signs it in.

use std::sync::Arc;

use crate::domain::account::{AccountError, Email, UserAccount};
use crate::domain::foundation::{ErrorCode, UserId, ValidationError};
use crate::ports::{IssuedToken, PasswordHasher, TokenIssuer, UserRepository};

/// Command to create an account.
#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Handler for signups.
pub struct SignupHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl SignupHandler {
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

    /// Creates the account and issues its first access token.
    ///
    /// # Errors
    ///
    /// - `Validation` for a malformed email, blank name or blank password
    /// - `EmailTaken` if the normalized email is already registered
    pub async fn handle(&self, cmd: SignupCommand) -> Result<IssuedToken, AccountError> {
        let email = Email::new(&cmd.email)?;
        if cmd.password.is_empty() {
            return Err(ValidationError::empty_field("password").into());
        }

        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AccountError::Infrastructure(e.to_string()))?
            .is_some()
        {
            return Err(AccountError::EmailTaken);
        }

        let hash = self
            .hasher
            .hash(&cmd.password)
            .await
            .map_err(|e| AccountError::Infrastructure(e.to_string()))?;
        let account = UserAccount::register(UserId::generate(), cmd.name, email, hash)?;

        // A concurrent signup can still win the race past the lookup above.
        self.users.create(&account).await.map_err(|e| match e.code {
            ErrorCode::AlreadyExists => AccountError::EmailTaken,
            _ => AccountError::Infrastructure(e.to_string()),
        })?;

        let token = self
            .tokens
            .issue(account.id())
            .map_err(|e| AccountError::Infrastructure(e.to_string()))?;

        tracing::info!(user_id = %account.id(), "Account created");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{JwtTokenService, MockPasswordHasher};
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::ports::SessionValidator;
    use secrecy::SecretString;

    fn setup() -> (SignupHandler, Arc<InMemoryUserRepository>, Arc<JwtTokenService>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::new("test-secret-that-is-long-enough-1234".into()),
            30,
            users.clone(),
        ));
        let handler = SignupHandler::new(users.clone(), Arc::new(MockPasswordHasher), tokens.clone());
        (handler, users, tokens)
    }

    fn cmd(email: &str) -> SignupCommand {
        SignupCommand {
            name: "Ada".into(),
            email: email.into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn signup_stores_hashed_password_and_issues_valid_token() {
        let (handler, users, tokens) = setup();

        let issued = handler.handle(cmd("Ada@Example.com")).await.unwrap();

        let email = Email::new("ada@example.com").unwrap();
        let account = users.find_by_email(&email).await.unwrap().unwrap();
        assert_ne!(account.password_hash(), "hunter2");

        let user = tokens.validate(&issued.token).await.unwrap();
        assert_eq!(&user.id, account.id());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let (handler, _, _) = setup();
        handler.handle(cmd("ada@example.com")).await.unwrap();

        let result = handler.handle(cmd("ADA@example.com")).await;

        assert_eq!(result.unwrap_err(), AccountError::EmailTaken);
    }

    #[tokio::test]
    async fn invalid_input_is_validation_error() {
        let (handler, _, _) = setup();

        let bad_email = handler.handle(cmd("not-an-email")).await;
        assert!(matches!(bad_email, Err(AccountError::Validation(_))));

        let mut no_password = cmd("a@example.com");
        no_password.password.clear();
        assert!(matches!(
            handler.handle(no_password).await,
            Err(AccountError::Validation(_))
        ));

        let mut no_name = cmd("b@example.com");
        no_name.name = "  ".into();
        assert!(matches!(
            handler.handle(no_name).await,
            Err(AccountError::Validation(_))
        ));
    }
}
