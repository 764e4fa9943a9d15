//! Private messages between two users
//!
//! The insert path is shared by the HTTP endpoint and the WebSocket `SendMessage`
//! event: store the row, flag the recipient's side unread, broadcast the row with
//! the sender's correlation id, notify the recipient if offline.

use super::image_url;
use super::notifications::notify_best_effort;
use crate::core::{AppError, AppState, Session};
use crate::dtos::{
    ChatMessageDTO, ConversationHistoryDTO, ConversationSummaryDTO, CreateMessageDTO,
    OpenConversationDTO, PageQuery, SendMessageDTO,
};
use crate::entities::Conversation;
use crate::repositories::{Create, Read};
use crate::storage::validate_path;
use crate::ws::utils::{publish_message, subscribe_participants};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Messages returned per history page
pub const HISTORY_PAGE: i64 = 50;

fn to_dto(state: &AppState, message: crate::entities::ChatMessage) -> ChatMessageDTO {
    let mut dto = ChatMessageDTO::from(message);
    dto.image_url = image_url(state, dto.image_path.as_deref());
    dto
}

/// Loads a conversation the user takes part in
async fn participant_conversation(
    state: &AppState,
    user_id: i64,
    conversation_id: i64,
) -> Result<Conversation, AppError> {
    let conversation = state
        .conversation
        .read(&conversation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;
    if !conversation.is_participant(user_id) {
        warn!(user_id, conversation_id, "Access to foreign conversation");
        return Err(AppError::forbidden("Not a participant of this conversation"));
    }
    Ok(conversation)
}

/// Validates, stores and fans out one message sent by `sender_id`
#[instrument(skip(state, payload))]
pub async fn deliver_message(
    state: &AppState,
    sender_id: i64,
    conversation_id: i64,
    payload: SendMessageDTO,
) -> Result<ChatMessageDTO, AppError> {
    payload.validate()?;
    if let Some(path) = &payload.image_path {
        validate_path(path)?;
    }

    let conversation = participant_conversation(state, sender_id, conversation_id).await?;
    let recipient_id = conversation.other_participant(sender_id);

    let stored = state
        .msg
        .create(&CreateMessageDTO {
            conversation_id,
            sender_id,
            content: payload.content,
            image_path: payload.image_path,
            created_at: Utc::now(),
        })
        .await?;

    state
        .conversation
        .set_unread(conversation_id, recipient_id, true)
        .await?;
    state.conversation.touch(conversation_id).await?;

    let mut dto = to_dto(state, stored);
    dto.client_ref = payload.client_ref;

    let receivers = publish_message(state, dto.clone());
    debug!(message_id = dto.message_id, receivers, "Message delivered");

    if !state.users_online.is_user_online(recipient_id) {
        let sender_name = state
            .profile
            .display_name(sender_id)
            .await?
            .unwrap_or_else(|| "Alguien".to_string());
        notify_best_effort(
            state,
            recipient_id,
            format!("Nuevo mensaje de {sender_name}"),
            Some(format!("/messages/{conversation_id}")),
        )
        .await;
    }

    Ok(dto)
}

/// Clears the unread flag `user_id` sees on the conversation
#[instrument(skip(state))]
pub async fn mark_conversation_read(
    state: &AppState,
    user_id: i64,
    conversation_id: i64,
) -> Result<(), AppError> {
    participant_conversation(state, user_id, conversation_id).await?;
    state
        .conversation
        .set_unread(conversation_id, user_id, false)
        .await?;
    Ok(())
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<ConversationSummaryDTO>>, AppError> {
    let conversations = state.conversation.list_for_user(session.user_id).await?;

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let other_user_id = conversation.other_participant(session.user_id);
        let other_user_name = state
            .profile
            .display_name(other_user_id)
            .await?
            .unwrap_or_default();
        let last_message = state
            .msg
            .last_in_conversation(conversation.conversation_id)
            .await?
            .map(|m| to_dto(&state, m));

        summaries.push(ConversationSummaryDTO {
            conversation_id: conversation.conversation_id,
            other_user_id,
            other_user_name,
            unread: conversation.unread_for(session.user_id),
            updated_at: conversation.updated_at,
            last_message,
        });
    }

    Ok(Json(summaries))
}

/// Opens (or reuses) the thread with another user
#[instrument(skip(state, session, body), fields(user_id = session.user_id, other = body.user_id))]
pub async fn open_conversation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<OpenConversationDTO>,
) -> Result<Json<ConversationSummaryDTO>, AppError> {
    if body.user_id == session.user_id {
        return Err(AppError::bad_request("Cannot open a conversation with yourself"));
    }
    let other_user_name = state
        .profile
        .display_name(body.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let conversation = state
        .conversation
        .find_or_create(session.user_id, body.user_id)
        .await?;
    subscribe_participants(&state, &conversation);

    info!(conversation_id = conversation.conversation_id, "Conversation opened");
    Ok(Json(ConversationSummaryDTO {
        conversation_id: conversation.conversation_id,
        other_user_id: body.user_id,
        other_user_name,
        unread: conversation.unread_for(session.user_id),
        updated_at: conversation.updated_at,
        last_message: None,
    }))
}

/// History page; viewing the thread marks it read
#[instrument(skip(state, session, query), fields(user_id = session.user_id))]
pub async fn read_conversation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(conversation_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ConversationHistoryDTO>, AppError> {
    let conversation = participant_conversation(&state, session.user_id, conversation_id).await?;

    let messages = state
        .msg
        .find_page(conversation_id, query.before.as_ref(), HISTORY_PAGE)
        .await?
        .into_iter()
        .map(|m| to_dto(&state, m))
        .collect();

    state
        .conversation
        .set_unread(conversation_id, session.user_id, false)
        .await?;

    Ok(Json(ConversationHistoryDTO {
        conversation_id,
        other_user_id: conversation.other_participant(session.user_id),
        messages,
    }))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(conversation_id): Path<i64>,
    Json(body): Json<SendMessageDTO>,
) -> Result<(StatusCode, Json<ChatMessageDTO>), AppError> {
    let message = deliver_message(&state, session.user_id, conversation_id, body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(conversation_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    mark_conversation_read(&state, session.user_id, conversation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
