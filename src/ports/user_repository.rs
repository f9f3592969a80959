//! User repository port.
//!
//! Accounts are looked up by id (token subject) and by email (login).
//! Email uniqueness is enforced here, not in the domain.

use crate::domain::account::{ChatEntry, Email, UserAccount};
use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a new account.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the email is taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &UserAccount) -> Result<(), DomainError>;

    /// Find an account by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Find an account by (normalized) email. Returns `None` if not found.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, DomainError>;

    /// Append an ended chat to the account's previous chats.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account doesn't exist
    async fn add_previous_chat(&self, id: &UserId, entry: &ChatEntry) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }
}
