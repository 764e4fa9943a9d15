//! Send protocol on top of a [`Timeline`]
//!
//! optimistic insert → attachment upload → row insert → confirm. Any failure
//! flags the optimistic entry as failed and stops; nothing is retried.

use super::timeline::{Applied, DeliveryStatus, Timeline};
use crate::core::AppError;
use crate::dtos::{ChatMessageDTO, SendMessageDTO};
use async_trait::async_trait;
use tracing::{instrument, warn};

/// Bucket chat attachments are uploaded to
pub const CHAT_BUCKET: &str = "chat";

/// Image picked by the user, not yet uploaded
#[derive(Debug, Clone)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// What the sending side needs from the server
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stores the bytes and returns the object path
    async fn upload(&self, bucket: &str, attachment: Attachment) -> Result<String, AppError>;

    async fn insert_message(
        &self,
        conversation_id: i64,
        payload: SendMessageDTO,
    ) -> Result<ChatMessageDTO, AppError>;

    /// Clears the unread flag of the local user on the thread
    async fn mark_read(&self, conversation_id: i64) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub client_ref: String,
    pub status: DeliveryStatus,
}

#[instrument(skip(backend, timeline, content, attachment), fields(conversation_id = timeline.conversation_id()))]
pub async fn send_message<B: ChatBackend + ?Sized>(
    backend: &B,
    timeline: &mut Timeline,
    content: &str,
    attachment: Option<Attachment>,
) -> SendOutcome {
    let client_ref = timeline.push_optimistic(content, None);

    let image_path = match attachment {
        Some(attachment) => match backend.upload(CHAT_BUCKET, attachment).await {
            Ok(path) => {
                timeline.attach(&client_ref, path.clone());
                Some(path)
            }
            Err(e) => {
                warn!(%client_ref, error = e.message(), "Attachment upload failed");
                return failed(timeline, client_ref);
            }
        },
        None => None,
    };

    let payload = SendMessageDTO {
        content: content.to_string(),
        image_path,
        client_ref: Some(client_ref.clone()),
    };

    match backend
        .insert_message(timeline.conversation_id(), payload)
        .await
    {
        Ok(stored) => {
            timeline.confirm(&client_ref, &stored);
            SendOutcome {
                client_ref,
                status: DeliveryStatus::Delivered,
            }
        }
        Err(e) => {
            warn!(%client_ref, error = e.message(), "Message insert failed");
            failed(timeline, client_ref)
        }
    }
}

/// Feeds a realtime event into the timeline, marking the thread read when the
/// other participant wrote while it is open.
pub async fn receive<B: ChatBackend + ?Sized>(
    backend: &B,
    timeline: &mut Timeline,
    event: &ChatMessageDTO,
) -> Result<Applied, AppError> {
    let applied = timeline.apply_event(event);
    if applied == Applied::Incoming {
        backend.mark_read(timeline.conversation_id()).await?;
    }
    Ok(applied)
}

fn failed(timeline: &mut Timeline, client_ref: String) -> SendOutcome {
    timeline.mark_failed(&client_ref);
    SendOutcome {
        client_ref,
        status: DeliveryStatus::Failed,
    }
}
