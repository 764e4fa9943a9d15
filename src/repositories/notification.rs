//! NotificationRepository

use super::Create;
use crate::dtos::CreateNotificationDTO;
use crate::entities::Notification;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct NotificationRepository {
    connection_pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT notification_id, user_id, message, link, read, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at DESC, notification_id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn count_unread(&self, user_id: i64) -> Result<i64, Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = 0")
                .bind(user_id)
                .fetch_one(&self.connection_pool)
                .await?;
        Ok(count)
    }

    /// Only the owner can flip the flag; false when nothing matched
    pub async fn mark_read(&self, user_id: i64, notification_id: i64) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read = 1 WHERE notification_id = ? AND user_id = ?",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, Error> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE user_id = ? AND read = 0")
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl Create<Notification, CreateNotificationDTO> for NotificationRepository {
    async fn create(&self, data: &CreateNotificationDTO) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message, link, read, created_at)
            VALUES (?, ?, ?, 0, ?)
            RETURNING notification_id, user_id, message, link, read, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(&data.message)
        .bind(&data.link)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }
}
