//! Integration tests for registration, login and the route guard
//!
//! Exercised:
//! - POST /auth/register
//! - POST /auth/login
//! - GET /navigation
//! - the session guard on protected and public paths

mod common;

#[cfg(test)]
mod auth_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::SqlitePool;
    use vitanova_server::entities::Role;

    #[sqlx::test]
    async fn test_register_then_login(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .post("/auth/register")
            .json(&json!({
                "username": "lucia",
                "password": "correcta123",
                "full_name": "Lucía Pérez"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["username"], "lucia");
        assert_eq!(body["role"], 0);

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "lucia", "password": "correcta123" }))
            .await;
        response.assert_status_ok();
        let cookie = response.header("set-cookie");
        assert!(cookie.to_str().unwrap().starts_with("token="));

        let token = response.json::<serde_json::Value>()["token"]
            .as_str()
            .unwrap()
            .to_string();
        let (name, value) = bearer(&token);
        server
            .get("/dashboard")
            .add_header(name, value)
            .await
            .assert_status_ok();

        Ok(())
    }

    #[sqlx::test]
    async fn test_register_duplicate_username(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        seed_user(&state, "lucia", Role::Regular).await;
        let server = create_test_server(state);

        let response = server
            .post("/auth/register")
            .json(&json!({
                "username": "lucia",
                "password": "correcta123",
                "full_name": "Otra Lucía"
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        Ok(())
    }

    #[sqlx::test]
    async fn test_register_invalid_form(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .post("/auth/register")
            .json(&json!({ "username": "x", "password": "123", "full_name": "" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[sqlx::test]
    async fn test_login_wrong_password(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let server = create_test_server(state);

        server
            .post("/auth/register")
            .json(&json!({
                "username": "marta",
                "password": "correcta123",
                "full_name": "Marta Gil"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "marta", "password": "incorrecta" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "nadie", "password": "correcta123" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[sqlx::test]
    async fn test_guard_redirects_without_session(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let server = create_test_server(state);

        let response = server.get("/dashboard").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        let (name, value) = bearer("not-a-jwt");
        let response = server.get("/community").add_header(name, value).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        server.get("/").await.assert_status_ok();
        server.get("/login").await.assert_status_ok();

        Ok(())
    }

    #[sqlx::test]
    async fn test_token_of_deleted_user_is_rejected(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let server = create_test_server(state);

        let token = create_test_jwt(999, "fantasma");
        let (name, value) = bearer(&token);
        let response = server.get("/dashboard").add_header(name, value).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        Ok(())
    }

    #[sqlx::test]
    async fn test_navigation_depends_on_role(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, regular) = login_as(&state, "ana", Role::Regular).await;
        let (_, moderator) = login_as(&state, "mod", Role::Moderator).await;
        let server = create_test_server(state);

        let (name, value) = bearer(&regular);
        let menu: Vec<serde_json::Value> = server.get("/navigation").add_header(name, value).await.json();
        assert!(menu.iter().any(|item| item["path"] == "/schedule"));
        assert!(menu.iter().all(|item| item["path"] != "/moderation"));

        let (name, value) = bearer(&moderator);
        let menu: Vec<serde_json::Value> = server.get("/navigation").add_header(name, value).await.json();
        assert!(menu.iter().any(|item| item["path"] == "/moderation"));
        assert!(menu.iter().all(|item| item["path"] != "/schedule"));

        Ok(())
    }
}
