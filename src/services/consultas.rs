//! Consultas - questions to professionals and their answers

use super::notifications::notify_best_effort;
use super::{PAGE_SIZE, image_url, remove_images_best_effort};
use crate::core::{AppError, AppState, Session, require_role};
use crate::dtos::{
    AnswerDTO, CreateAnswerDTO, CreateQuestionDTO, PageQuery, QuestionDetailDTO, QuestionSummaryDTO,
};
use crate::entities::Role;
use crate::repositories::{Delete, Read};
use crate::storage::validate_path;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

fn with_url(state: &AppState, mut question: QuestionSummaryDTO) -> QuestionSummaryDTO {
    question.image_url = image_url(state, question.image_path.as_deref());
    question
}

#[instrument(skip(state, _session, query))]
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<QuestionSummaryDTO>>, AppError> {
    let questions = state
        .question
        .list_questions(query.before.as_ref(), PAGE_SIZE)
        .await?
        .into_iter()
        .map(|q| with_url(&state, q))
        .collect();
    Ok(Json(questions))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<CreateQuestionDTO>,
) -> Result<(StatusCode, Json<QuestionSummaryDTO>), AppError> {
    body.validate()?;
    if let Some(path) = &body.image_path {
        validate_path(path)?;
    }

    let question = state.question.create_question(session.user_id, &body).await?;
    let summary = state
        .question
        .find_summary(question.question_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Created question not found"))?;

    info!(question_id = question.question_id, "Question published");
    Ok((StatusCode::CREATED, Json(with_url(&state, summary))))
}

#[instrument(skip(state, _session))]
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Path(question_id): Path<i64>,
) -> Result<Json<QuestionDetailDTO>, AppError> {
    let question = state
        .question
        .find_summary(question_id)
        .await?
        .ok_or_else(|| AppError::not_found("Question not found"))?;
    let answers = state.question.list_answers(question_id).await?;

    Ok(Json(QuestionDetailDTO {
        question: with_url(&state, question),
        answers,
    }))
}

/// Only professionals answer; the asker gets a notification
#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_answer(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(question_id): Path<i64>,
    Json(body): Json<CreateAnswerDTO>,
) -> Result<(StatusCode, Json<AnswerDTO>), AppError> {
    require_role(&session, &[Role::Professional])?;
    body.validate()?;

    let question = state
        .question
        .read(&question_id)
        .await?
        .ok_or_else(|| AppError::not_found("Question not found"))?;

    let answer = state
        .question
        .create_answer(question_id, session.user_id, &body)
        .await?;
    let author_name = state
        .profile
        .display_name(session.user_id)
        .await?
        .unwrap_or_else(|| session.username.clone());

    notify_best_effort(
        &state,
        question.author_id,
        format!("{author_name} respondió tu consulta \"{}\"", question.title),
        Some(format!("/consultas/{question_id}")),
    )
    .await;

    info!(question_id, answer_id = answer.answer_id, "Answer published");
    Ok((
        StatusCode::CREATED,
        Json(AnswerDTO {
            answer_id: answer.answer_id,
            question_id: answer.question_id,
            author_id: answer.author_id,
            author_name,
            body: answer.body,
            created_at: answer.created_at,
        }),
    ))
}

/// Askers can withdraw their question; its answers go with it
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(question_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let question = state
        .question
        .read(&question_id)
        .await?
        .ok_or_else(|| AppError::not_found("Question not found"))?;

    if question.author_id != session.user_id {
        warn!(question_id, "Delete attempted by non-author");
        return Err(AppError::forbidden("Only the author can delete this question"));
    }

    remove_images_best_effort(&state, question.image_path).await;
    state.question.delete(&question_id).await?;

    info!(question_id, "Question deleted by author");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn delete_answer(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((question_id, answer_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let answer = state
        .question
        .find_answer(question_id, answer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Answer not found"))?;

    if answer.author_id != session.user_id {
        warn!(answer_id, "Delete attempted by non-author");
        return Err(AppError::forbidden("Only the author can delete this answer"));
    }

    state.question.delete_answer(answer_id).await?;

    info!(question_id, answer_id, "Answer deleted by author");
    Ok(StatusCode::NO_CONTENT)
}
