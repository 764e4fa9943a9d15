//! MessageRepository - chat messages of a conversation

use super::{Create, Read};
use crate::dtos::CreateMessageDTO;
use crate::entities::ChatMessage;
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Page of messages in a conversation
    ///
    /// Without `before_date` the most recent `limit` messages are returned; with it,
    /// the `limit` messages preceding that instant. Result is oldest first so it can
    /// be rendered as is.
    pub async fn find_page(
        &self,
        conversation_id: i64,
        before_date: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, Error> {
        let mut messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT message_id, conversation_id, sender_id, content, image_path, created_at
            FROM chat_messages
            WHERE conversation_id = ?1
              AND (?2 IS NULL OR created_at < ?2)
            ORDER BY created_at DESC, message_id DESC
            LIMIT ?3
            "#,
        )
        .bind(conversation_id)
        .bind(before_date)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await?;

        messages.reverse();
        Ok(messages)
    }

    pub async fn last_in_conversation(&self, conversation_id: i64) -> Result<Option<ChatMessage>, Error> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT message_id, conversation_id, sender_id, content, image_path, created_at
            FROM chat_messages
            WHERE conversation_id = ?
            ORDER BY created_at DESC, message_id DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Create<ChatMessage, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> Result<ChatMessage, Error> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (conversation_id, sender_id, content, image_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING message_id, conversation_id, sender_id, content, image_path, created_at
            "#,
        )
        .bind(data.conversation_id)
        .bind(data.sender_id)
        .bind(&data.content)
        .bind(&data.image_path)
        .bind(data.created_at)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<ChatMessage, i64> for MessageRepository {
    async fn read(&self, id: &i64) -> Result<Option<ChatMessage>, Error> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT message_id, conversation_id, sender_id, content, image_path, created_at
            FROM chat_messages
            WHERE message_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
