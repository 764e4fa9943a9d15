use crate::core::guard::{self, GuardDecision};
use crate::core::{AppError, AppState};
use crate::entities::Role;
use crate::repositories::Read;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::{Error, body::Body, extract::Request, http, http::HeaderMap, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Session lifetime, also used as the cookie Max-Age
pub const SESSION_HOURS: i64 = 24;

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i64,
    pub username: String,
}

/// Identity resolved for the current request, inserted as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

#[instrument(skip(secret), fields(username = %username, id = %id))]
pub fn encode_jwt(username: String, id: i64, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(SESSION_HOURS);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        username,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Reads the session token from `Authorization: Bearer` or from the `token` cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        let mut parts = value.split_whitespace();
        if let (Some("Bearer"), Some(token)) = (parts.next(), parts.next()) {
            return Some(token.to_string());
        }
    }

    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == "token" && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Turns a token into a [`Session`]. Invalid tokens and unknown users yield `None`.
pub async fn resolve_session(state: &AppState, token: &str) -> Result<Option<Session>, AppError> {
    let token_data = match decode_jwt(token, &state.jwt_secret) {
        Ok(data) => data,
        Err(_) => return Ok(None),
    };

    let Some(user) = state.user.read(&token_data.claims.id).await? else {
        warn!("User not found in database: {}", token_data.claims.username);
        return Ok(None);
    };

    // a missing profile row means the first login has not completed yet
    let role = state
        .profile
        .read(&user.user_id)
        .await?
        .map(|p| p.role)
        .unwrap_or(Role::Regular);

    Ok(Some(Session {
        user_id: user.user_id,
        username: user.username,
        role,
    }))
}

/// Resolves the optional session, applies the route guard and exposes the
/// session to handlers through an `Extension<Session>`.
#[instrument(skip(state, req, next), fields(path = %req.uri().path()))]
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let session = match extract_token(req.headers()) {
        Some(token) => resolve_session(&state, &token).await?,
        None => None,
    };

    match guard::check(req.uri().path(), session.as_ref().map(|s| s.role)) {
        GuardDecision::Allow => {}
        GuardDecision::Redirect(target) => {
            info!(target, "Request redirected by route guard");
            return Ok(Redirect::to(target).into_response());
        }
    }

    if let Some(session) = session {
        debug!(user_id = session.user_id, role = ?session.role, "Session resolved");
        req.extensions_mut().insert(session);
    }
    Ok(next.run(req).await)
}

/// Checks that the session holds one of the allowed roles
pub fn require_role(session: &Session, allowed_roles: &[Role]) -> Result<(), AppError> {
    if !allowed_roles.contains(&session.role) {
        warn!(
            "User {} has insufficient role {:?}, required one of: {:?}",
            session.user_id, session.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }
    Ok(())
}
