//! Community feed - posts and replies

use super::notifications::notify_best_effort;
use super::{PAGE_SIZE, image_url, remove_images_best_effort};
use crate::core::{AppError, AppState, Session};
use crate::dtos::{
    CreatePostDTO, CreateReplyDTO, PageQuery, PostSummaryDTO, PostThreadDTO, ReplyDTO,
};
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

fn with_url(state: &AppState, mut post: PostSummaryDTO) -> PostSummaryDTO {
    post.image_url = image_url(state, post.image_path.as_deref());
    post
}

#[instrument(skip(state, _session, query))]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<PostSummaryDTO>>, AppError> {
    let posts = state
        .community
        .list_posts(query.before.as_ref(), PAGE_SIZE)
        .await?
        .into_iter()
        .map(|p| with_url(&state, p))
        .collect();
    Ok(Json(posts))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<CreatePostDTO>,
) -> Result<(StatusCode, Json<PostSummaryDTO>), AppError> {
    body.validate()?;
    if let Some(path) = &body.image_path {
        validate_path(path)?;
    }

    let post = state.community.create_post(session.user_id, &body).await?;
    let summary = state
        .community
        .find_summary(post.post_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Created post not found"))?;

    info!(post_id = post.post_id, "Post published");
    Ok((StatusCode::CREATED, Json(with_url(&state, summary))))
}

#[instrument(skip(state, _session))]
pub async fn get_post_thread(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostThreadDTO>, AppError> {
    let post = state
        .community
        .find_summary(post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    let replies = state
        .community
        .list_replies(post_id)
        .await?
        .into_iter()
        .map(|mut r| {
            r.image_url = image_url(&state, r.image_path.as_deref());
            r
        })
        .collect();

    Ok(Json(PostThreadDTO {
        post: with_url(&state, post),
        replies,
    }))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<i64>,
    Json(body): Json<CreateReplyDTO>,
) -> Result<(StatusCode, Json<ReplyDTO>), AppError> {
    body.validate()?;
    if let Some(path) = &body.image_path {
        validate_path(path)?;
    }

    let post = state
        .community
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let reply = state.community.create_reply(post_id, session.user_id, &body).await?;
    let author_name = state
        .profile
        .display_name(session.user_id)
        .await?
        .unwrap_or_else(|| session.username.clone());

    if post.author_id != session.user_id {
        notify_best_effort(
            &state,
            post.author_id,
            format!("{author_name} respondió a tu publicación"),
            Some(format!("/community/{post_id}")),
        )
        .await;
    }

    let mut dto = ReplyDTO::from_reply(reply, author_name);
    dto.image_url = image_url(&state, dto.image_path.as_deref());
    info!(post_id, reply_id = dto.reply_id, "Reply published");
    Ok((StatusCode::CREATED, Json(dto)))
}

/// Authors can withdraw their own posts; moderators use the moderation endpoint
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let post = state
        .community
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if post.author_id != session.user_id {
        warn!(post_id, "Delete attempted by non-author");
        return Err(AppError::forbidden("Only the author can delete this post"));
    }

    let reply_images = state.community.reply_image_paths(post_id).await?;
    remove_images_best_effort(&state, post.image_path.into_iter().chain(reply_images)).await;
    state.community.delete(&post_id).await?;

    info!(post_id, "Post deleted by author");
    Ok(StatusCode::NO_CONTENT)
}

/// Authors can withdraw their own replies
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((post_id, reply_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let reply = state
        .community
        .find_reply(post_id, reply_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reply not found"))?;

    if reply.author_id != session.user_id {
        warn!(reply_id, "Delete attempted by non-author");
        return Err(AppError::forbidden("Only the author can delete this reply"));
    }

    remove_images_best_effort(&state, reply.image_path).await;
    state.community.delete_reply(reply_id).await?;

    info!(post_id, reply_id, "Reply deleted by author");
    Ok(StatusCode::NO_CONTENT)
}
