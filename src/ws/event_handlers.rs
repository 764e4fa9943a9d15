//! WebSocket Event Handlers - frames sent by the client

use crate::core::AppState;
use crate::dtos::WsClientEventDTO;
use crate::services::messages::{deliver_message, mark_conversation_read};
use crate::ws::utils::send_error_to_user;
use tracing::{debug, instrument, warn};

/// Dispatches one client event. Failures go back to the sender as an error event;
/// the message itself reaches everyone through the conversation broadcast.
#[instrument(skip(state, event))]
pub async fn process_client_event(state: &AppState, user_id: i64, event: WsClientEventDTO) {
    let result = match event {
        WsClientEventDTO::SendMessage(payload) => {
            debug!(conversation_id = payload.conversation_id, "Send message event");
            deliver_message(state, user_id, payload.conversation_id, payload.message)
                .await
                .map(|_| ())
        }
        WsClientEventDTO::MarkRead { conversation_id } => {
            debug!(conversation_id, "Mark read event");
            mark_conversation_read(state, user_id, conversation_id).await
        }
    };

    if let Err(e) = result {
        warn!(status = %e.status(), error = e.message(), "Client event rejected");
        send_error_to_user(state, user_id, e.status().as_u16(), e.message());
    }
}
