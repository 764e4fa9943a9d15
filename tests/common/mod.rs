#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::HeaderName;
use sqlx::SqlitePool;
use std::sync::Arc;
use vitanova_server::core::{AppState, encode_jwt};
use vitanova_server::dtos::{CreateProfileDTO, CreateUserDTO};
use vitanova_server::entities::Role;
use vitanova_server::repositories::Create;
use vitanova_server::storage::MemoryObjectStore;

pub const JWT_SECRET: &str = "vitanova-test-secret-not-for-production";
pub const PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// State over the per-test database, with an in-memory object store the test can inspect
pub fn create_test_state(pool: SqlitePool) -> (Arc<AppState>, Arc<MemoryObjectStore>) {
    let store = Arc::new(MemoryObjectStore::new(PUBLIC_BASE_URL));
    let state = Arc::new(AppState::new(pool, JWT_SECRET.to_string(), store.clone()));
    (state, store)
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = vitanova_server::create_router(state, None);
    TestServer::new(app).expect("Failed to create test server")
}

/// Valid session token for a seeded user
pub fn create_test_jwt(user_id: i64, username: &str) -> String {
    encode_jwt(username.to_string(), user_id, JWT_SECRET).expect("Failed to create JWT token")
}

/// Inserts a user with a profile of the given role and returns its id.
/// The stored password is not a bcrypt hash: seeded users authenticate with tokens.
pub async fn seed_user(state: &AppState, username: &str, role: Role) -> i64 {
    let user = state
        .user
        .create(&CreateUserDTO {
            username: username.to_string(),
            password: "seeded-without-password".to_string(),
        })
        .await
        .expect("Failed to seed user");
    state
        .profile
        .create(&CreateProfileDTO {
            user_id: user.user_id,
            full_name: format!("{username} Test"),
            role,
        })
        .await
        .expect("Failed to seed profile");
    user.user_id
}

/// `(name, value)` pair for an authenticated request
pub fn bearer(token: &str) -> (HeaderName, String) {
    (HeaderName::from_static("authorization"), format!("Bearer {token}"))
}

/// Seeds a user and returns its id with a session token
pub async fn login_as(state: &AppState, username: &str, role: Role) -> (i64, String) {
    let user_id = seed_user(state, username, role).await;
    (user_id, create_test_jwt(user_id, username))
}
