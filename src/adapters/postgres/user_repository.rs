//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use uuid::Uuid;

use super::rows::{column, db_error};
use crate::domain::account::{ChatEntry, Email, UserAccount};
use crate::domain::foundation::{ChatId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::UserRepository;

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn previous_chats(&self, id: &str) -> Result<Vec<ChatEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT chat_id, title
            FROM user_previous_chats
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch previous chats", e))?;

        rows.iter()
            .map(|row| {
                let chat_id: Uuid = column(row, "chat_id")?;
                let title: String = column(row, "title")?;
                Ok(ChatEntry::new(ChatId::from_uuid(chat_id), title))
            })
            .collect()
    }

    async fn hydrate(&self, row: Option<PgRow>) -> Result<Option<UserAccount>, DomainError> {
        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = column(&row, "id")?;
        let previous = self.previous_chats(&id).await?;
        row_to_account(&row, previous).map(Some)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &UserAccount) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.name())
        .bind(user.email().as_str())
        .bind(user.password_hash())
        .bind(user.created_at().as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                DomainError::new(ErrorCode::AlreadyExists, "Email already exists"),
            ),
            Err(e) => Err(db_error("insert user", e)),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch user", e))?;

        self.hydrate(row).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch user by email", e))?;

        self.hydrate(row).await
    }

    async fn add_previous_chat(&self, id: &UserId, entry: &ChatEntry) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_previous_chats (user_id, chat_id, title)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(id.as_str())
        .bind(entry.chat_id.as_uuid())
        .bind(&entry.title)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("record previous chat", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", id),
            ));
        }

        Ok(())
    }
}

fn row_to_account(row: &PgRow, previous_chats: Vec<ChatEntry>) -> Result<UserAccount, DomainError> {
    let id: String = column(row, "id")?;
    let name: String = column(row, "name")?;
    let email: String = column(row, "email")?;
    let password_hash: String = column(row, "password_hash")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;

    let id = UserId::new(id)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid id: {}", e)))?;
    let email = Email::new(email)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid email: {}", e)))?;

    Ok(UserAccount::reconstitute(
        id,
        name,
        email,
        password_hash,
        previous_chats,
        Timestamp::from_datetime(created_at),
    ))
}
