//! Community DTOs - feed items, composers and thread view

use crate::entities::CommunityReply;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Feed row joined with the author's name and the reply count
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct PostSummaryDTO {
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub body: String,
    pub image_path: Option<String>,
    #[sqlx(skip)]
    pub image_url: Option<String>,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ReplyDTO {
    pub reply_id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub body: String,
    pub image_path: Option<String>,
    #[sqlx(skip)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReplyDTO {
    pub fn from_reply(reply: CommunityReply, author_name: String) -> Self {
        Self {
            reply_id: reply.reply_id,
            post_id: reply.post_id,
            author_id: reply.author_id,
            author_name,
            body: reply.body,
            image_path: reply.image_path,
            image_url: None,
            created_at: reply.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostThreadDTO {
    pub post: PostSummaryDTO,
    pub replies: Vec<ReplyDTO>,
}

/// Post composer
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreatePostDTO {
    #[validate(length(min = 10, max = 2000, message = "Post must be between 10 and 2000 characters"))]
    pub body: String,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
}

/// Reply composer
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateReplyDTO {
    #[validate(length(min = 2, max = 1000, message = "Reply must be between 2 and 1000 characters"))]
    pub body: String,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
}
