//! QuestionRepository - consultas and professional answers

use super::{Delete, Read};
use crate::dtos::{AnswerDTO, CreateAnswerDTO, CreateQuestionDTO, QuestionSummaryDTO};
use crate::entities::{Answer, Question};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const QUESTION_SUMMARY_SELECT: &str = r#"
    SELECT
        q.question_id,
        q.author_id,
        COALESCE(pr.full_name, u.username) AS author_name,
        q.title,
        q.body,
        q.image_path,
        (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.question_id) AS answer_count,
        q.created_at
    FROM questions q
    JOIN users u ON u.user_id = q.author_id
    LEFT JOIN profiles pr ON pr.user_id = q.author_id
"#;

pub struct QuestionRepository {
    connection_pool: SqlitePool,
}

impl QuestionRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn list_questions(
        &self,
        before: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<QuestionSummaryDTO>, Error> {
        sqlx::query_as::<_, QuestionSummaryDTO>(&format!(
            r#"{QUESTION_SUMMARY_SELECT}
            WHERE (?1 IS NULL OR q.created_at < ?1)
            ORDER BY q.created_at DESC, q.question_id DESC
            LIMIT ?2"#
        ))
        .bind(before)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_summary(&self, question_id: i64) -> Result<Option<QuestionSummaryDTO>, Error> {
        sqlx::query_as::<_, QuestionSummaryDTO>(&format!(
            "{QUESTION_SUMMARY_SELECT} WHERE q.question_id = ?"
        ))
        .bind(question_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn create_question(
        &self,
        author_id: i64,
        data: &CreateQuestionDTO,
    ) -> Result<Question, Error> {
        sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (author_id, title, body, image_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING question_id, author_id, title, body, image_path, created_at
            "#,
        )
        .bind(author_id)
        .bind(&data.title)
        .bind(&data.body)
        .bind(&data.image_path)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }

    pub async fn list_answers(&self, question_id: i64) -> Result<Vec<AnswerDTO>, Error> {
        sqlx::query_as::<_, AnswerDTO>(
            r#"
            SELECT
                a.answer_id,
                a.question_id,
                a.author_id,
                COALESCE(pr.full_name, u.username) AS author_name,
                a.body,
                a.created_at
            FROM answers a
            JOIN users u ON u.user_id = a.author_id
            LEFT JOIN profiles pr ON pr.user_id = a.author_id
            WHERE a.question_id = ?
            ORDER BY a.created_at ASC, a.answer_id ASC
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn create_answer(
        &self,
        question_id: i64,
        author_id: i64,
        data: &CreateAnswerDTO,
    ) -> Result<Answer, Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (question_id, author_id, body, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING answer_id, question_id, author_id, body, created_at
            "#,
        )
        .bind(question_id)
        .bind(author_id)
        .bind(&data.body)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }

    pub async fn find_answer(&self, question_id: i64, answer_id: i64) -> Result<Option<Answer>, Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            SELECT answer_id, question_id, author_id, body, created_at
            FROM answers WHERE question_id = ? AND answer_id = ?
            "#,
        )
        .bind(question_id)
        .bind(answer_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn delete_answer(&self, answer_id: i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM answers WHERE answer_id = ?")
            .bind(answer_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Read<Question, i64> for QuestionRepository {
    async fn read(&self, id: &i64) -> Result<Option<Question>, Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT question_id, author_id, title, body, image_path, created_at
            FROM questions WHERE question_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for QuestionRepository {
    /// Answers go with the question (ON DELETE CASCADE)
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM questions WHERE question_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
