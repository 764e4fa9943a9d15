//! Announcements published by professionals

use super::{PAGE_SIZE, image_url};
use crate::core::{AppError, AppState, Session, require_role};
use crate::dtos::{AnnouncementDTO, CreateAnnouncementDTO, PageQuery};
use crate::entities::Role;
use crate::storage::validate_path;
use axum::{
    Extension,
    extract::{Json, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[instrument(skip(state, _session, query))]
pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<AnnouncementDTO>>, AppError> {
    let announcements = state
        .announcement
        .list(query.before.as_ref(), PAGE_SIZE)
        .await?
        .into_iter()
        .map(|mut a| {
            a.image_url = image_url(&state, a.image_path.as_deref());
            a
        })
        .collect();
    Ok(Json(announcements))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<CreateAnnouncementDTO>,
) -> Result<(StatusCode, Json<AnnouncementDTO>), AppError> {
    require_role(&session, &[Role::Professional])?;
    body.validate()?;
    if let Some(path) = &body.image_path {
        validate_path(path)?;
    }

    let announcement_id = state.announcement.create(session.user_id, &body).await?;
    let mut announcement = state
        .announcement
        .find(announcement_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Created announcement not found"))?;
    announcement.image_url = image_url(&state, announcement.image_path.as_deref());

    info!(announcement_id, "Announcement published");
    Ok((StatusCode::CREATED, Json(announcement)))
}
