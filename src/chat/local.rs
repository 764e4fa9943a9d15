//! In-process [`ChatBackend`] acting on behalf of one user

use super::sender::{Attachment, ChatBackend};
use crate::core::{AppError, AppState};
use crate::dtos::{ChatMessageDTO, SendMessageDTO};
use crate::services::messages::{deliver_message, mark_conversation_read};
use async_trait::async_trait;
use std::sync::Arc;

pub struct LocalChatBackend {
    state: Arc<AppState>,
    user_id: i64,
}

impl LocalChatBackend {
    pub fn new(state: Arc<AppState>, user_id: i64) -> Self {
        Self { state, user_id }
    }
}

#[async_trait]
impl ChatBackend for LocalChatBackend {
    async fn upload(&self, bucket: &str, attachment: Attachment) -> Result<String, AppError> {
        let stored = self
            .state
            .store
            .put(bucket, attachment.bytes, &attachment.content_type)
            .await?;
        Ok(stored.path)
    }

    async fn insert_message(
        &self,
        conversation_id: i64,
        payload: SendMessageDTO,
    ) -> Result<ChatMessageDTO, AppError> {
        deliver_message(&self.state, self.user_id, conversation_id, payload).await
    }

    async fn mark_read(&self, conversation_id: i64) -> Result<(), AppError> {
        mark_conversation_read(&self.state, self.user_id, conversation_id).await
    }
}
