//! WebSocket utilities shared by HTTP handlers and the realtime tasks

use crate::core::AppState;
use crate::dtos::ChatMessageDTO;
use crate::entities::Conversation;
use crate::ws::usermap::InternalSignal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Pushes an error event to the user's connection, if any
pub fn send_error_to_user(state: &AppState, user_id: i64, code: u16, message: impl Into<String>) {
    state.users_online.send_if_online(
        user_id,
        InternalSignal::Error {
            code,
            message: message.into(),
        },
    );
}

/// Makes the online participants' connections forward a conversation they
/// were not following when they connected.
#[instrument(skip(state, conversation), fields(conversation_id = conversation.conversation_id))]
pub fn subscribe_participants(state: &AppState, conversation: &Conversation) {
    for user_id in [conversation.user_a, conversation.user_b] {
        if state.users_online.is_user_online(user_id) {
            let rx = state.chats_online.subscribe(conversation.conversation_id);
            state.users_online.send_if_online(
                user_id,
                InternalSignal::AddConversation {
                    conversation_id: conversation.conversation_id,
                    rx,
                },
            );
        }
    }
}

/// Broadcasts a stored message to the connections following its conversation.
/// Returns how many connections received it.
#[instrument(skip(state, message), fields(conversation_id = message.conversation_id, message_id = message.message_id))]
pub fn publish_message(state: &AppState, message: ChatMessageDTO) -> usize {
    let conversation_id = message.conversation_id;
    match state.chats_online.send(conversation_id, Arc::new(message)) {
        Ok(receivers) => receivers,
        Err(_) => {
            debug!("Message stored with no live receivers");
            0
        }
    }
}
