//! Message DTOs - conversations, chat messages and the send form

use crate::entities::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Chat message as seen by clients, both on fetch and on the realtime topic.
/// `client_ref` is only set on the event that answers the sender's own request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessageDTO {
    pub message_id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub image_path: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ref: Option<String>,
}

impl From<ChatMessage> for ChatMessageDTO {
    fn from(value: ChatMessage) -> Self {
        Self {
            message_id: value.message_id,
            conversation_id: value.conversation_id,
            sender_id: value.sender_id,
            content: value.content,
            image_path: value.image_path,
            image_url: None,
            created_at: value.created_at,
            client_ref: None,
        }
    }
}

/// Insert payload for the chat_messages table
#[derive(Debug, Clone)]
pub struct CreateMessageDTO {
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Send form. Either a non-blank text or an attachment is required.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_message_payload"))]
pub struct SendMessageDTO {
    #[serde(default)]
    #[validate(length(max = 5000, message = "Message content must be at most 5000 characters"))]
    pub content: String,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
    #[validate(length(min = 1, max = 64, message = "Correlation id must be between 1 and 64 characters"))]
    pub client_ref: Option<String>,
}

/// Same form carried over the WebSocket, where the conversation is in the body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WsSendMessageDTO {
    pub conversation_id: i64,
    #[serde(flatten)]
    pub message: SendMessageDTO,
}

fn validate_message_payload(dto: &SendMessageDTO) -> Result<(), ValidationError> {
    if dto.content.trim().is_empty() && dto.image_path.is_none() {
        return Err(ValidationError::new("empty_message")
            .with_message(Cow::Borrowed("A message needs text or an attachment")));
    }
    Ok(())
}

/// Opens (or returns) the conversation with another user
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OpenConversationDTO {
    pub user_id: i64,
}

/// Conversation list entry as seen by one participant
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConversationSummaryDTO {
    pub conversation_id: i64,
    pub other_user_id: i64,
    pub other_user_name: String,
    pub unread: bool,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<ChatMessageDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConversationHistoryDTO {
    pub conversation_id: i64,
    pub other_user_id: i64,
    pub messages: Vec<ChatMessageDTO>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_without_attachment_is_rejected() {
        let blank = SendMessageDTO { content: "   ".into(), image_path: None, client_ref: None };
        assert!(blank.validate().is_err());

        let image_only = SendMessageDTO {
            content: String::new(),
            image_path: Some("chat/abc.png".into()),
            client_ref: Some("tmp-1".into()),
        };
        assert!(image_only.validate().is_ok());
    }

    #[test]
    fn ws_payload_flattens_the_form() {
        let dto: WsSendMessageDTO = serde_json::from_value(serde_json::json!({
            "conversation_id": 4,
            "content": "hola",
            "client_ref": "tmp-9"
        }))
        .unwrap();
        assert_eq!(dto.conversation_id, 4);
        assert_eq!(dto.message.client_ref.as_deref(), Some("tmp-9"));
    }
}
