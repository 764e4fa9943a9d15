//! Auth services - registration and login

use crate::core::auth::SESSION_HOURS;
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateProfileDTO, CreateUserDTO, LoginDTO, RegisterDTO, SessionDTO};
use crate::entities::{Role, User};
use crate::repositories::Create;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

fn session_headers(token: &str) -> Result<HeaderMap, AppError> {
    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        token,
        SESSION_HOURS * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build session cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build session header"))?,
    );
    Ok(headers)
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    let Some(user) = state.user.find_by_username(&body.username).await? else {
        warn!("Login attempt for unknown user");
        return Err(AppError::unauthorized("Username or password are not correct."));
    };

    if !user.verify_password(&body.password) {
        warn!("Login attempt with wrong password");
        return Err(AppError::unauthorized("Username or password are not correct."));
    }

    // first login after an interrupted registration creates the profile here
    let profile = state.profile.ensure_exists(user.user_id, &user.username).await?;

    let token = encode_jwt(user.username.clone(), user.user_id, &state.jwt_secret)?;
    let headers = session_headers(&token)?;

    info!(user_id = user.user_id, "User logged in");
    Ok((
        StatusCode::OK,
        headers,
        Json(SessionDTO {
            token,
            user_id: user.user_id,
            username: user.username,
            role: profile.role,
        }),
    ))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterDTO>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;

    if state.user.find_by_username(&body.username).await?.is_some() {
        warn!("Username already taken");
        return Err(AppError::conflict("Username already exists"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let user = state
        .user
        .create(&CreateUserDTO {
            username: body.username,
            password: password_hash,
        })
        .await?;

    let profile = state
        .profile
        .create(&CreateProfileDTO {
            user_id: user.user_id,
            full_name: body.full_name,
            role: Role::Regular,
        })
        .await?;

    let token = encode_jwt(user.username.clone(), user.user_id, &state.jwt_secret)?;
    let headers = session_headers(&token)?;

    info!(user_id = user.user_id, "User registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(SessionDTO {
            token,
            user_id: user.user_id,
            username: user.username,
            role: profile.role,
        }),
    ))
}
