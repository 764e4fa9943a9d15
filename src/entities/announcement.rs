//! Announcement entity - professional broadcast post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Announcement {
    pub announcement_id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
