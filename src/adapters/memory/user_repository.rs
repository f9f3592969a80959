//! In-memory account store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{ChatEntry, Email, UserAccount};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

/// In-memory storage for user accounts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes an account (tests use this to simulate deletion).
    pub async fn remove(&self, id: &UserId) -> Option<UserAccount> {
        self.users.write().await.remove(id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &UserAccount) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                "Email already exists",
            ));
        }
        users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn add_previous_chat(&self, id: &UserId, entry: &ChatEntry) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, "User not found")
                .with_detail("user_id", id.as_str())
        })?;
        user.add_previous_chat(entry.clone());
        Ok(())
    }
}
