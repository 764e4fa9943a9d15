//! Services module - HTTP handlers, one sub-module per screen
//!
//! Handlers take the state and the `Session` extension placed by the session
//! middleware, and return `Result<_, AppError>`.

pub mod announcements;
pub mod auth;
pub mod community;
pub mod consultas;
pub mod content;
pub mod dashboard;
pub mod messages;
pub mod moderation;
pub mod notifications;
pub mod profile;
pub mod schedule;
pub mod uploads;

pub use announcements::{create_announcement, list_announcements};
pub use auth::{login_user, register_user};
pub use community::{
    create_post, create_reply, delete_post, delete_reply, get_post_thread, list_posts,
};
pub use consultas::{
    create_answer, create_question, delete_answer, delete_question, get_question, list_questions,
};
pub use content::{create_recipe, create_routine, list_recipes, list_routines};
pub use dashboard::{get_dashboard, get_navigation};
pub use messages::{list_conversations, mark_read, open_conversation, read_conversation, send_message};
pub use moderation::{change_role, list_moderation_log, moderate_delete};
pub use notifications::{list_notifications, mark_all_notifications_read, mark_notification_read};
pub use profile::{get_profile, submit_questionnaire, update_profile, validate_questionnaire_step};
pub use schedule::{book_appointment, get_availability, list_appointments, update_appointment_status};
pub use uploads::upload_file;

use crate::core::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Items per page on the feeds
pub const PAGE_SIZE: i64 = 20;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

/// Public landing the guard redirects to
pub async fn login_page() -> impl IntoResponse {
    Json(json!({
        "login": "/auth/login",
        "register": "/auth/register",
    }))
}

/// Public URL of an optional stored object
pub(crate) fn image_url(state: &AppState, path: Option<&str>) -> Option<String> {
    path.map(|p| state.store.public_url(p))
}

/// Removes stored objects whose rows are gone. Failures are logged and skipped.
pub(crate) async fn remove_images_best_effort<I>(state: &AppState, paths: I)
where
    I: IntoIterator<Item = String>,
{
    for path in paths {
        if let Err(e) = state.store.delete(&path).await {
            warn!(%path, "Failed to delete stored image: {}", e);
        }
    }
}
