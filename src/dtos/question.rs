//! Consultas DTOs - professional questions and answers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct QuestionSummaryDTO {
    pub question_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub body: String,
    pub image_path: Option<String>,
    #[sqlx(skip)]
    pub image_url: Option<String>,
    pub answer_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct AnswerDTO {
    pub answer_id: i64,
    pub question_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionDetailDTO {
    pub question: QuestionSummaryDTO,
    pub answers: Vec<AnswerDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateQuestionDTO {
    #[validate(length(min = 5, max = 150, message = "Title must be between 5 and 150 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 2000, message = "Question must be between 10 and 2000 characters"))]
    pub body: String,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateAnswerDTO {
    #[validate(length(min = 10, max = 2000, message = "Answer must be between 10 and 2000 characters"))]
    pub body: String,
}
