//! ModerationRepository - content lookup/removal across sections and the action log

use super::Create;
use crate::entities::{ContentSection, ModerationAction, ModerationActionType};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

/// Row to append to the moderation log
#[derive(Debug, Clone)]
pub struct NewModerationAction {
    pub moderator_id: i64,
    pub target_user_id: i64,
    pub action_type: ModerationActionType,
    pub section: Option<ContentSection>,
    pub content_id: Option<i64>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Author and stored image of a piece of content
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ContentOwner {
    pub author_id: i64,
    pub image_path: Option<String>,
}

pub struct ModerationRepository {
    connection_pool: SqlitePool,
}

impl ModerationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_content_owner(
        &self,
        section: ContentSection,
        content_id: i64,
    ) -> Result<Option<ContentOwner>, Error> {
        let (table, pk, author) = section.table();
        let image = if section.has_image() { "image_path" } else { "NULL" };
        sqlx::query_as::<_, ContentOwner>(&format!(
            "SELECT {author} AS author_id, {image} AS image_path FROM {table} WHERE {pk} = ?"
        ))
        .bind(content_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Removes the row; dependent rows go through ON DELETE CASCADE
    pub async fn delete_content(&self, section: ContentSection, content_id: i64) -> Result<bool, Error> {
        let (table, pk, _) = section.table();
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE {pk} = ?"))
            .bind(content_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Log entries, newest first
    pub async fn list_actions(&self, limit: i64) -> Result<Vec<ModerationAction>, Error> {
        sqlx::query_as::<_, ModerationAction>(
            r#"
            SELECT action_id, moderator_id, target_user_id, action_type, section, content_id, reason, created_at
            FROM moderation_actions
            ORDER BY created_at DESC, action_id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<ModerationAction, NewModerationAction> for ModerationRepository {
    async fn create(&self, data: &NewModerationAction) -> Result<ModerationAction, Error> {
        sqlx::query_as::<_, ModerationAction>(
            r#"
            INSERT INTO moderation_actions
                (moderator_id, target_user_id, action_type, section, content_id, reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING action_id, moderator_id, target_user_id, action_type, section, content_id, reason, created_at
            "#,
        )
        .bind(data.moderator_id)
        .bind(data.target_user_id)
        .bind(data.action_type)
        .bind(data.section)
        .bind(data.content_id)
        .bind(&data.reason)
        .bind(data.created_at)
        .fetch_one(&self.connection_pool)
        .await
    }
}
