//! Moderation - content removal with an audit trail, and role changes
//!
//! A deletion runs three steps in order: stored image, content row, log row.
//! There is no compensation; an error names the step that failed.

use super::remove_images_best_effort;
use crate::core::{AppError, AppState, Session, require_role};
use crate::dtos::{ChangeRoleDTO, ModerationDeleteDTO, ProfileDTO};
use crate::entities::{ContentSection, ModerationAction, ModerationActionType, Role};
use crate::repositories::{Create, NewModerationAction};
use crate::storage::StorageError;
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use axum_macros::debug_handler;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

const LOG_PAGE: i64 = 100;

#[instrument(skip(state, session), fields(moderator_id = session.user_id))]
pub async fn list_moderation_log(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<ModerationAction>>, AppError> {
    require_role(&session, &[Role::Moderator])?;
    Ok(Json(state.moderation.list_actions(LOG_PAGE).await?))
}

#[debug_handler]
#[instrument(skip(state, session, body), fields(moderator_id = session.user_id, section = %section))]
pub async fn moderate_delete(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((section, content_id)): Path<(ContentSection, i64)>,
    Json(body): Json<ModerationDeleteDTO>,
) -> Result<Json<ModerationAction>, AppError> {
    require_role(&session, &[Role::Moderator])?;
    body.validate()?;

    let owner = state
        .moderation
        .find_content_owner(section, content_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content not found"))?;

    // 1. stored image; an already missing object does not block the removal
    if let Some(path) = &owner.image_path {
        match state.store.delete(path).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                error!(%path, "Moderation failed while deleting the image: {}", e);
                return Err(AppError::from(e)
                    .with_details("step 1/3 (image) failed; nothing else was changed"));
            }
        }
    }

    // replies removed by the cascade leave their images behind
    if section == ContentSection::CommunityPost {
        let reply_images = state.community.reply_image_paths(content_id).await?;
        remove_images_best_effort(&state, reply_images).await;
    }

    // 2. content row
    match state.moderation.delete_content(section, content_id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(content_id, "Content vanished before deletion");
            return Err(AppError::not_found("Content not found")
                .with_details("step 2/3 (content) found no row; the image may already be gone"));
        }
        Err(e) => {
            error!(content_id, "Moderation failed while deleting the row: {:?}", e);
            return Err(AppError::from(e)
                .with_details("step 2/3 (content) failed; the image was already removed"));
        }
    }

    // 3. audit row
    let action = state
        .moderation
        .create(&NewModerationAction {
            moderator_id: session.user_id,
            target_user_id: owner.author_id,
            action_type: ModerationActionType::DeleteContent,
            section: Some(section),
            content_id: Some(content_id),
            reason: body.reason,
            created_at: Utc::now(),
        })
        .await
        .map_err(|e| {
            error!(content_id, "Moderation failed while writing the log: {:?}", e);
            AppError::from(e).with_details("step 3/3 (log) failed; the content was already removed")
        })?;

    info!(content_id, target_user_id = owner.author_id, "Content removed by moderator");
    Ok(Json(action))
}

#[debug_handler]
#[instrument(skip(state, session, body), fields(moderator_id = session.user_id, role = ?body.role))]
pub async fn change_role(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<i64>,
    Json(body): Json<ChangeRoleDTO>,
) -> Result<Json<ProfileDTO>, AppError> {
    require_role(&session, &[Role::Moderator])?;
    body.validate()?;
    if user_id == session.user_id {
        return Err(AppError::bad_request("Moderators cannot change their own role"));
    }

    let profile = state.profile.update_role(user_id, body.role).await?;

    state
        .moderation
        .create(&NewModerationAction {
            moderator_id: session.user_id,
            target_user_id: user_id,
            action_type: ModerationActionType::ChangeRole,
            section: None,
            content_id: None,
            reason: body.reason,
            created_at: Utc::now(),
        })
        .await?;

    info!(user_id, "Role changed");
    Ok(Json(ProfileDTO::from(profile)))
}
