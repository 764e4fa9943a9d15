//! Profile screen and health questionnaire

use crate::core::{AppError, AppState, Session};
use crate::dtos::{HealthQuestionnaireDTO, ProfileDTO, QuestionnaireStepDTO, UpdateProfileDTO};
use crate::repositories::{Read, Update};
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

fn with_username(profile: crate::entities::Profile, session: &Session) -> ProfileDTO {
    let mut dto = ProfileDTO::from(profile);
    dto.username = Some(session.username.clone());
    dto
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ProfileDTO>, AppError> {
    let profile = state
        .profile
        .read(&session.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;
    Ok(Json(with_username(profile, &session)))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<UpdateProfileDTO>,
) -> Result<Json<ProfileDTO>, AppError> {
    body.validate()?;
    let profile = state.profile.update(&session.user_id, &body).await?;
    info!("Profile updated");
    Ok(Json(with_username(profile, &session)))
}

/// Checks one step of the questionnaire so the client can move on
#[instrument(skip(session, body), fields(user_id = session.user_id))]
pub async fn validate_questionnaire_step(
    Extension(session): Extension<Session>,
    Json(body): Json<QuestionnaireStepDTO>,
) -> Result<StatusCode, AppError> {
    body.validate_step()?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn submit_questionnaire(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<HealthQuestionnaireDTO>,
) -> Result<Json<ProfileDTO>, AppError> {
    body.validate()?;
    let profile = state.profile.save_questionnaire(session.user_id, &body).await?;
    info!("Health questionnaire completed");
    Ok(Json(with_username(profile, &session)))
}
