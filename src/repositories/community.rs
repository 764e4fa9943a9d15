//! CommunityRepository - feed posts and replies

use super::{Delete, Read};
use crate::dtos::{CreatePostDTO, CreateReplyDTO, PostSummaryDTO, ReplyDTO};
use crate::entities::{CommunityPost, CommunityReply};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const POST_SUMMARY_SELECT: &str = r#"
    SELECT
        p.post_id,
        p.author_id,
        COALESCE(pr.full_name, u.username) AS author_name,
        p.body,
        p.image_path,
        (SELECT COUNT(*) FROM community_replies r WHERE r.post_id = p.post_id) AS reply_count,
        p.created_at
    FROM community_posts p
    JOIN users u ON u.user_id = p.author_id
    LEFT JOIN profiles pr ON pr.user_id = p.author_id
"#;

pub struct CommunityRepository {
    connection_pool: SqlitePool,
}

impl CommunityRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Newest posts first; `before` continues from the oldest post already shown
    pub async fn list_posts(
        &self,
        before: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<PostSummaryDTO>, Error> {
        sqlx::query_as::<_, PostSummaryDTO>(&format!(
            r#"{POST_SUMMARY_SELECT}
            WHERE (?1 IS NULL OR p.created_at < ?1)
            ORDER BY p.created_at DESC, p.post_id DESC
            LIMIT ?2"#
        ))
        .bind(before)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_summary(&self, post_id: i64) -> Result<Option<PostSummaryDTO>, Error> {
        sqlx::query_as::<_, PostSummaryDTO>(&format!("{POST_SUMMARY_SELECT} WHERE p.post_id = ?"))
            .bind(post_id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn create_post(
        &self,
        author_id: i64,
        data: &CreatePostDTO,
    ) -> Result<CommunityPost, Error> {
        sqlx::query_as::<_, CommunityPost>(
            r#"
            INSERT INTO community_posts (author_id, body, image_path, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING post_id, author_id, body, image_path, created_at
            "#,
        )
        .bind(author_id)
        .bind(&data.body)
        .bind(&data.image_path)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Replies of a post in conversation order
    pub async fn list_replies(&self, post_id: i64) -> Result<Vec<ReplyDTO>, Error> {
        sqlx::query_as::<_, ReplyDTO>(
            r#"
            SELECT
                r.reply_id,
                r.post_id,
                r.author_id,
                COALESCE(pr.full_name, u.username) AS author_name,
                r.body,
                r.image_path,
                r.created_at
            FROM community_replies r
            JOIN users u ON u.user_id = r.author_id
            LEFT JOIN profiles pr ON pr.user_id = r.author_id
            WHERE r.post_id = ?
            ORDER BY r.created_at ASC, r.reply_id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn create_reply(
        &self,
        post_id: i64,
        author_id: i64,
        data: &CreateReplyDTO,
    ) -> Result<CommunityReply, Error> {
        sqlx::query_as::<_, CommunityReply>(
            r#"
            INSERT INTO community_replies (post_id, author_id, body, image_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING reply_id, post_id, author_id, body, image_path, created_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(&data.body)
        .bind(&data.image_path)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }

    pub async fn find_reply(&self, post_id: i64, reply_id: i64) -> Result<Option<CommunityReply>, Error> {
        sqlx::query_as::<_, CommunityReply>(
            r#"
            SELECT reply_id, post_id, author_id, body, image_path, created_at
            FROM community_replies WHERE post_id = ? AND reply_id = ?
            "#,
        )
        .bind(post_id)
        .bind(reply_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn delete_reply(&self, reply_id: i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM community_replies WHERE reply_id = ?")
            .bind(reply_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stored images of the replies under a post, which the cascade leaves behind
    pub async fn reply_image_paths(&self, post_id: i64) -> Result<Vec<String>, Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT image_path FROM community_replies WHERE post_id = ? AND image_path IS NOT NULL",
        )
        .bind(post_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Read<CommunityPost, i64> for CommunityRepository {
    async fn read(&self, id: &i64) -> Result<Option<CommunityPost>, Error> {
        sqlx::query_as::<_, CommunityPost>(
            "SELECT post_id, author_id, body, image_path, created_at FROM community_posts WHERE post_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for CommunityRepository {
    /// Replies go with the post (ON DELETE CASCADE)
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM community_posts WHERE post_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
