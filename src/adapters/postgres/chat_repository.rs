//! PostgreSQL implementation of ChatRepository.
//!
//! Chats live in `chats`; their histories in `chat_messages`, ordered by the
//! `seq` column. Appends are single INSERTs, so the sequence linearizes
//! concurrent writers.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::rows::{column, db_error};
use crate::domain::chat::Chat;
use crate::domain::foundation::{ChatId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::intake::{ChatMessage, Sender};
use crate::ports::ChatRepository;

/// PostgreSQL implementation of ChatRepository.
#[derive(Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &ChatId) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chats WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check chat existence", e))?;

        Ok(result.0 > 0)
    }

    async fn messages_for(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<ChatMessage>>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT chat_id, sender, text, sent_at
            FROM chat_messages
            WHERE chat_id = ANY($1)
            ORDER BY seq ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch chat messages", e))?;

        let mut grouped: HashMap<Uuid, Vec<ChatMessage>> = HashMap::new();
        for row in rows {
            let chat_id: Uuid = column(&row, "chat_id")?;
            grouped.entry(chat_id).or_default().push(row_to_message(&row)?);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn create(&self, chat: &Chat) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO chats (id, owner_id, title, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(chat.id().as_uuid())
        .bind(chat.owner().as_str())
        .bind(chat.title())
        .bind(chat.created_at().as_datetime())
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DomainError::new(ErrorCode::AlreadyExists, "Chat already exists"));
            }
            Err(e) => return Err(db_error("insert chat", e)),
        }

        for message in chat.messages() {
            sqlx::query(
                r#"
                INSERT INTO chat_messages (chat_id, sender, text, sent_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(chat.id().as_uuid())
            .bind(message.sender().as_str())
            .bind(message.text())
            .bind(message.timestamp().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("insert chat message", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit chat", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, DomainError> {
        let row = sqlx::query("SELECT id, owner_id, title, created_at FROM chats WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch chat", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut messages = self.messages_for(&[*id.as_uuid()]).await?;
        let history = messages.remove(id.as_uuid()).unwrap_or_default();
        row_to_chat(&row, history).map(Some)
    }

    async fn append_message(&self, id: &ChatId, message: &ChatMessage) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO chat_messages (chat_id, sender, text, sent_at)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM chats WHERE id = $1)
            "#,
        )
        .bind(id.as_uuid())
        .bind(message.sender().as_str())
        .bind(message.text())
        .bind(message.timestamp().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("append chat message", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ChatNotFound,
                format!("Chat not found: {}", id),
            ));
        }

        Ok(())
    }

    async fn read_all(&self, id: &ChatId) -> Result<Vec<ChatMessage>, DomainError> {
        if !self.exists(id).await? {
            return Err(DomainError::new(
                ErrorCode::ChatNotFound,
                format!("Chat not found: {}", id),
            ));
        }

        let mut messages = self.messages_for(&[*id.as_uuid()]).await?;
        Ok(messages.remove(id.as_uuid()).unwrap_or_default())
    }

    async fn find_many(&self, ids: &[ChatId], limit: usize) -> Result<Vec<Chat>, DomainError> {
        if ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(
            "SELECT id, owner_id, title, created_at FROM chats WHERE id = ANY($1)",
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch chats", e))?;

        let mut by_id: HashMap<Uuid, PgRow> = HashMap::with_capacity(rows.len());
        for row in rows {
            by_id.insert(column(&row, "id")?, row);
        }

        let wanted: Vec<Uuid> = uuids
            .into_iter()
            .filter(|id| by_id.contains_key(id))
            .take(limit)
            .collect();
        let mut messages = self.messages_for(&wanted).await?;

        wanted
            .iter()
            .filter_map(|id| by_id.get(id).map(|row| (id, row)))
            .map(|(id, row)| row_to_chat(row, messages.remove(id).unwrap_or_default()))
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_message(row: &PgRow) -> Result<ChatMessage, DomainError> {
    let sender: String = column(row, "sender")?;
    let sender: Sender = sender.parse().map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid sender: {}", e))
    })?;
    let text: String = column(row, "text")?;
    let sent_at: chrono::DateTime<chrono::Utc> = column(row, "sent_at")?;

    Ok(ChatMessage::new(sender, text, Timestamp::from_datetime(sent_at)))
}

fn row_to_chat(row: &PgRow, messages: Vec<ChatMessage>) -> Result<Chat, DomainError> {
    let id: Uuid = column(row, "id")?;
    let owner_id: String = column(row, "owner_id")?;
    let title: String = column(row, "title")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;

    let owner = UserId::new(owner_id).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid owner_id: {}", e))
    })?;

    Ok(Chat::reconstitute(
        ChatId::from_uuid(id),
        owner,
        title,
        messages,
        Timestamp::from_datetime(created_at),
    ))
}
