//! Notifications - stored per user and pushed live when the user is connected

use crate::core::{AppError, AppState, Session};
use crate::dtos::{CreateNotificationDTO, NotificationDTO};
use crate::repositories::Create;
use crate::ws::usermap::InternalSignal;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const NOTIFICATION_PAGE: i64 = 50;

/// Stores a notification and pushes it to the user's live connection.
/// Returns whether it was delivered live.
#[instrument(skip(state, message, link))]
pub async fn notify(
    state: &AppState,
    user_id: i64,
    message: impl Into<String>,
    link: Option<String>,
) -> Result<bool, AppError> {
    let notification = state
        .notification
        .create(&CreateNotificationDTO {
            user_id,
            message: message.into(),
            link,
        })
        .await?;

    let pushed = state.users_online.send_if_online(
        user_id,
        InternalSignal::Notification(NotificationDTO::from(notification)),
    );
    debug!(pushed, "Notification stored");
    Ok(pushed)
}

/// Like [`notify`] but never fails the caller: the main action already happened.
pub async fn notify_best_effort(state: &AppState, user_id: i64, message: String, link: Option<String>) {
    if let Err(e) = notify(state, user_id, message, link).await {
        warn!(user_id, error = e.message(), "Failed to store notification");
    }
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<NotificationDTO>>, AppError> {
    let notifications = state
        .notification
        .list_for_user(session.user_id, NOTIFICATION_PAGE)
        .await?
        .into_iter()
        .map(NotificationDTO::from)
        .collect();
    Ok(Json(notifications))
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(notification_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state
        .notification
        .mark_read(session.user_id, notification_id)
        .await?
    {
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn mark_all_notifications_read(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let updated = state.notification.mark_all_read(session.user_id).await?;
    Ok(Json(json!({ "updated": updated })))
}
