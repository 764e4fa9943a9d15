//! Professional Q&A entities (consultas)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Question {
    pub question_id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Answers can only be authored by professionals.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Answer {
    pub answer_id: i64,
    pub question_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
