//! ConversationRepository - one row per pair of users

use super::Read;
use crate::entities::{Conversation, ordered_pair};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct ConversationRepository {
    connection_pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_between(&self, first: i64, second: i64) -> Result<Option<Conversation>, Error> {
        let (user_a, user_b) = ordered_pair(first, second);
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, user_a, user_b, unread_a, unread_b, updated_at
            FROM conversations
            WHERE user_a = ? AND user_b = ?
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Opens the thread between two users, reusing it when it already exists
    pub async fn find_or_create(&self, first: i64, second: i64) -> Result<Conversation, Error> {
        let (user_a, user_b) = ordered_pair(first, second);
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO conversations (user_a, user_b, unread_a, unread_b, updated_at)
            VALUES (?, ?, 0, 0, ?)
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        self.find_between(user_a, user_b)
            .await?
            .ok_or(Error::RowNotFound)
    }

    /// Threads of a user, most recently active first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, user_a, user_b, unread_a, unread_b, updated_at
            FROM conversations
            WHERE user_a = ?1 OR user_b = ?1
            ORDER BY updated_at DESC, conversation_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Sets the unread flag seen by `user_id`
    pub async fn set_unread(&self, conversation_id: i64, user_id: i64, unread: bool) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE conversations SET
                unread_a = CASE WHEN user_a = ?2 THEN ?3 ELSE unread_a END,
                unread_b = CASE WHEN user_b = ?2 THEN ?3 ELSE unread_b END
            WHERE conversation_id = ?1
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .bind(unread)
        .execute(&self.connection_pool)
        .await?;
        Ok(())
    }

    pub async fn touch(&self, conversation_id: i64) -> Result<(), Error> {
        sqlx::query("UPDATE conversations SET updated_at = ? WHERE conversation_id = ?")
            .bind(Utc::now())
            .bind(conversation_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }
}

impl Read<Conversation, i64> for ConversationRepository {
    async fn read(&self, id: &i64) -> Result<Option<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, user_a, user_b, unread_a, unread_b, updated_at
            FROM conversations
            WHERE conversation_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
