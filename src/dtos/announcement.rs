//! Announcement DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct AnnouncementDTO {
    pub announcement_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub body: String,
    pub image_path: Option<String>,
    #[sqlx(skip)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateAnnouncementDTO {
    #[validate(length(min = 5, max = 150, message = "Title must be between 5 and 150 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 3000, message = "Announcement must be between 10 and 3000 characters"))]
    pub body: String,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
}
