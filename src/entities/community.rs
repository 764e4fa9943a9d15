//! Community feed entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct CommunityPost {
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct CommunityReply {
    pub reply_id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
