//! Moderation action log entity

use super::enums::{ContentSection, ModerationActionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ModerationAction {
    pub action_id: i64,
    pub moderator_id: i64,
    pub target_user_id: i64,
    pub action_type: ModerationActionType,
    /// Set for content deletions, empty for role changes
    pub section: Option<ContentSection>,
    pub content_id: Option<i64>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
