//! VitaNova server library - exposes the modules for the binary and the tests

pub mod chat;
pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod schedule;
pub mod services;
pub mod storage;
pub mod ws;

pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, delete, get, patch, post},
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Multipart bodies may carry a little framing on top of the 5 MB file
const UPLOAD_BODY_LIMIT: usize = storage::MAX_UPLOAD_BYTES + 1024 * 1024;

/// Builds the application router.
///
/// Every route goes through the session middleware, which also applies the
/// route guard. `files_dir` serves stored objects under `/files` when set.
pub fn create_router(state: Arc<AppState>, files_dir: Option<PathBuf>) -> Router {
    use crate::core::session_middleware;
    use services::*;
    use ws::ws_handler;

    let mut router = Router::new()
        .route("/", get(root))
        .route("/login", get(login_page))
        .nest("/auth", configure_auth_routes())
        .route("/navigation", get(get_navigation))
        .route("/dashboard", get(get_dashboard))
        .nest("/profile", configure_profile_routes())
        .nest("/community", configure_community_routes())
        .nest("/consultas", configure_consultas_routes())
        .route("/announcements", get(list_announcements).post(create_announcement))
        .nest("/messages", configure_message_routes())
        .nest("/schedule", configure_schedule_routes())
        .route("/routines", get(list_routines).post(create_routine))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .nest("/notifications", configure_notification_routes())
        .nest("/moderation", configure_moderation_routes())
        .route(
            "/uploads/{bucket}",
            post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/ws", any(ws_handler));

    if let Some(dir) = files_dir {
        router = router.nest_service("/files", ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

fn configure_profile_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(get_profile).patch(update_profile))
        .route("/questionnaire", post(submit_questionnaire))
        .route("/questionnaire/step", post(validate_questionnaire_step))
}

fn configure_community_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{post_id}", get(get_post_thread).delete(delete_post))
        .route("/{post_id}/replies", post(create_reply))
        .route("/{post_id}/replies/{reply_id}", delete(delete_reply))
}

fn configure_consultas_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route("/{question_id}", get(get_question).delete(delete_question))
        .route("/{question_id}/answers", post(create_answer))
        .route("/{question_id}/answers/{answer_id}", delete(delete_answer))
}

fn configure_message_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_conversations).post(open_conversation))
        .route("/{conversation_id}", get(read_conversation).post(send_message))
        .route("/{conversation_id}/read", patch(mark_read))
}

fn configure_schedule_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(get_availability).post(book_appointment))
        .route("/appointments", get(list_appointments))
        .route("/appointments/{appointment_id}/status", patch(update_appointment_status))
}

fn configure_notification_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_notifications))
        .route("/read", patch(mark_all_notifications_read))
        .route("/{notification_id}/read", patch(mark_notification_read))
}

fn configure_moderation_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_moderation_log))
        .route("/{section}/{content_id}", delete(moderate_delete))
        .route("/users/{user_id}/role", patch(change_role))
}
