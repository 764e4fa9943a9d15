//! Dashboard and navigation

use super::image_url;
use crate::core::guard::{MenuItem, menu_for};
use crate::core::{AppError, AppState, Session};
use crate::dtos::{AnnouncementDTO, AppointmentDTO, NotificationDTO, ProfileDTO};
use crate::entities::Role;
use crate::repositories::Read;
use axum::{Extension, extract::{Json, State}};
use chrono::{Duration, Utc};
use futures::future;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

const DASHBOARD_ANNOUNCEMENTS: i64 = 3;
const DASHBOARD_NOTIFICATIONS: i64 = 5;
const UPCOMING_DAYS: i64 = 30;

#[derive(Serialize, Debug)]
pub struct DashboardDTO {
    pub profile: ProfileDTO,
    pub unread_notifications: i64,
    pub notifications: Vec<NotificationDTO>,
    pub upcoming_appointments: Vec<AppointmentDTO>,
    pub announcements: Vec<AnnouncementDTO>,
}

#[instrument(skip(session), fields(user_id = session.user_id))]
pub async fn get_navigation(Extension(session): Extension<Session>) -> Json<Vec<MenuItem>> {
    Json(menu_for(session.role))
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<DashboardDTO>, AppError> {
    let profile = state
        .profile
        .read(&session.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;
    let mut profile = ProfileDTO::from(profile);
    profile.username = Some(session.username.clone());

    let (unread_notifications, notifications, announcements) = future::try_join3(
        state.notification.count_unread(session.user_id),
        state
            .notification
            .list_for_user(session.user_id, DASHBOARD_NOTIFICATIONS),
        state.announcement.list(None, DASHBOARD_ANNOUNCEMENTS),
    )
    .await?;
    let notifications = notifications.into_iter().map(NotificationDTO::from).collect();

    // moderators have no agenda
    let upcoming_appointments = if session.role == Role::Moderator {
        Vec::new()
    } else {
        let now = Utc::now();
        state
            .appointment
            .list_active_between(&now, &(now + Duration::days(UPCOMING_DAYS)))
            .await?
            .into_iter()
            .filter(|a| session.role == Role::Professional || a.user_id == session.user_id)
            .map(AppointmentDTO::from)
            .collect()
    };

    let announcements = announcements
        .into_iter()
        .map(|mut a| {
            a.image_url = image_url(&state, a.image_path.as_deref());
            a
        })
        .collect();

    debug!("Dashboard assembled");
    Ok(Json(DashboardDTO {
        profile,
        unread_notifications,
        notifications,
        upcoming_appointments,
        announcements,
    }))
}
