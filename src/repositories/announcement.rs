//! AnnouncementRepository

use crate::dtos::{AnnouncementDTO, CreateAnnouncementDTO};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const ANNOUNCEMENT_SELECT: &str = r#"
    SELECT
        a.announcement_id,
        a.author_id,
        COALESCE(pr.full_name, u.username) AS author_name,
        a.title,
        a.body,
        a.image_path,
        a.created_at
    FROM announcements a
    JOIN users u ON u.user_id = a.author_id
    LEFT JOIN profiles pr ON pr.user_id = a.author_id
"#;

pub struct AnnouncementRepository {
    connection_pool: SqlitePool,
}

impl AnnouncementRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn list(
        &self,
        before: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<AnnouncementDTO>, Error> {
        sqlx::query_as::<_, AnnouncementDTO>(&format!(
            r#"{ANNOUNCEMENT_SELECT}
            WHERE (?1 IS NULL OR a.created_at < ?1)
            ORDER BY a.created_at DESC, a.announcement_id DESC
            LIMIT ?2"#
        ))
        .bind(before)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find(&self, announcement_id: i64) -> Result<Option<AnnouncementDTO>, Error> {
        sqlx::query_as::<_, AnnouncementDTO>(&format!(
            "{ANNOUNCEMENT_SELECT} WHERE a.announcement_id = ?"
        ))
        .bind(announcement_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Returns the new row id
    pub async fn create(&self, author_id: i64, data: &CreateAnnouncementDTO) -> Result<i64, Error> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO announcements (author_id, title, body, image_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING announcement_id
            "#,
        )
        .bind(author_id)
        .bind(&data.title)
        .bind(&data.body)
        .bind(&data.image_path)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await?;
        Ok(id)
    }
}
