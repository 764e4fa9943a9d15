//! Chat message entity
//!
//! Delivery status and the client correlation id never reach this row:
//! they only exist on the sending client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ChatMessage {
    pub message_id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
