//! WebSocket Event DTOs
//!
//! Serialized as `{ "type": "NewMessage", "data": { ... } }`.

use crate::dtos::{ChatMessageDTO, NotificationDTO, WsSendMessageDTO};
use serde::{Deserialize, Serialize};

/// Server to client
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsEventDTO {
    NewMessage(ChatMessageDTO),
    Notification(NotificationDTO),
    Error { code: u16, message: String },
}

/// Client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsClientEventDTO {
    SendMessage(WsSendMessageDTO),
    MarkRead { conversation_id: i64 },
}
