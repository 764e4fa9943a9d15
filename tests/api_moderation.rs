//! Integration tests for moderation and role-gated content
//!
//! Exercised:
//! - GET /moderation
//! - DELETE /moderation/{section}/{content_id}
//! - PATCH /moderation/users/{user_id}/role
//! - POST /announcements, POST /routines, GET /routines

mod common;

#[cfg(test)]
mod moderation_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use sqlx::SqlitePool;
    use vitanova_server::entities::Role;
    use vitanova_server::storage::ObjectStore;

    #[sqlx::test]
    async fn test_moderator_deletes_post_and_logs_it(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, store) = create_test_state(pool);
        let (ana_id, ana) = login_as(&state, "ana", Role::Regular).await;
        let (moderator_id, moderator) = login_as(&state, "mod", Role::Moderator).await;
        let image = store
            .put("community", vec![7; 16], "image/webp")
            .await
            .expect("Failed to store image");
        let server = create_test_server(state);

        let (name, value) = bearer(&ana);
        let post: Value = server
            .post("/community")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "body": "Contenido que no cumple las normas", "image_path": image.path }))
            .await
            .json();
        let post_id = post["post_id"].as_i64().unwrap();

        let (mod_name, mod_value) = bearer(&moderator);
        let response = server
            .delete(&format!("/moderation/community_post/{post_id}"))
            .add_header(mod_name.clone(), mod_value.clone())
            .json(&json!({ "reason": "Publicidad no permitida" }))
            .await;
        response.assert_status_ok();
        let action: Value = response.json();
        assert_eq!(action["target_user_id"], ana_id);
        assert_eq!(action["moderator_id"], moderator_id);
        assert_eq!(action["section"], "community_post");
        assert_eq!(action["content_id"], post_id);

        assert!(!store.contains(&image.path));
        let feed: Vec<Value> = server.get("/community").add_header(name, value).await.json();
        assert!(feed.is_empty());

        let log: Vec<Value> = server
            .get("/moderation")
            .add_header(mod_name.clone(), mod_value.clone())
            .await
            .json();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0]["action_type"], "delete_content");
        assert_eq!(log[0]["reason"], "Publicidad no permitida");

        server
            .delete(&format!("/moderation/community_post/{post_id}"))
            .add_header(mod_name, mod_value)
            .json(&json!({ "reason": "Publicidad no permitida" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        Ok(())
    }

    #[sqlx::test]
    async fn test_moderated_post_takes_reply_images_along(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, store) = create_test_state(pool);
        let (_, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, bea) = login_as(&state, "bea", Role::Regular).await;
        let (_, moderator) = login_as(&state, "mod", Role::Moderator).await;
        let reply_image = store
            .put("community", vec![2; 10], "image/png")
            .await
            .expect("Failed to store image");
        let server = create_test_server(state);

        let (name, value) = bearer(&ana);
        let post: Value = server
            .post("/community")
            .add_header(name, value)
            .json(&json!({ "body": "Oferta de suplementos milagro" }))
            .await
            .json();
        let post_id = post["post_id"].as_i64().unwrap();

        let (bea_name, bea_value) = bearer(&bea);
        server
            .post(&format!("/community/{post_id}/replies"))
            .add_header(bea_name, bea_value)
            .json(&json!({ "body": "¿Esto funciona?", "image_path": reply_image.path }))
            .await
            .assert_status(StatusCode::CREATED);

        let (mod_name, mod_value) = bearer(&moderator);
        server
            .delete(&format!("/moderation/community_post/{post_id}"))
            .add_header(mod_name, mod_value)
            .json(&json!({ "reason": "Publicidad no permitida" }))
            .await
            .assert_status_ok();
        assert!(!store.contains(&reply_image.path));
        assert!(store.is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn test_deletion_needs_a_reason(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, moderator) = login_as(&state, "mod", Role::Moderator).await;
        let server = create_test_server(state);

        let (name, value) = bearer(&ana);
        let post: Value = server
            .post("/community")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "body": "Una publicación cualquiera" }))
            .await
            .json();
        let post_id = post["post_id"].as_i64().unwrap();

        let (mod_name, mod_value) = bearer(&moderator);
        server
            .delete(&format!("/moderation/community_post/{post_id}"))
            .add_header(mod_name.clone(), mod_value.clone())
            .json(&json!({ "reason": "spam" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let feed: Vec<Value> = server.get("/community").add_header(name, value).await.json();
        assert_eq!(feed.len(), 1);
        let log: Vec<Value> = server.get("/moderation").add_header(mod_name, mod_value).await.json();
        assert!(log.is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn test_non_moderators_are_redirected(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, doc) = login_as(&state, "doctora", Role::Professional).await;
        let server = create_test_server(state);

        let (name, value) = bearer(&doc);
        let response = server
            .delete("/moderation/community_post/1")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "reason": "Publicidad no permitida" }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard");

        let response = server.get("/moderation").add_header(name, value).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard");

        Ok(())
    }

    #[sqlx::test]
    async fn test_role_change_is_logged(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, ana) = login_as(&state, "ana", Role::Regular).await;
        let (moderator_id, moderator) = login_as(&state, "mod", Role::Moderator).await;
        let server = create_test_server(state);

        let (mod_name, mod_value) = bearer(&moderator);
        let profile: Value = server
            .patch(&format!("/moderation/users/{ana_id}/role"))
            .add_header(mod_name.clone(), mod_value.clone())
            .json(&json!({ "role": 1, "reason": "Nutricionista colegiada verificada" }))
            .await
            .json();
        assert_eq!(profile["role"], 1);

        server
            .patch(&format!("/moderation/users/{moderator_id}/role"))
            .add_header(mod_name.clone(), mod_value.clone())
            .json(&json!({ "role": 0, "reason": "Quiero dejar de moderar" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let log: Vec<Value> = server.get("/moderation").add_header(mod_name, mod_value).await.json();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0]["action_type"], "change_role");
        assert!(log[0]["section"].is_null());

        // the new role applies to the next request with the same token
        let (name, value) = bearer(&ana);
        server
            .post("/announcements")
            .add_header(name, value)
            .json(&json!({
                "title": "Taller de nutrición",
                "body": "El sábado a las 10:00 en la sala principal."
            }))
            .await
            .assert_status(StatusCode::CREATED);

        Ok(())
    }

    #[sqlx::test]
    async fn test_routines_are_professional_content(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, doc) = login_as(&state, "coach", Role::Professional).await;
        let server = create_test_server(state);

        let routine = json!({
            "title": "Circuito en casa",
            "description": "Tres rondas de sentadillas, flexiones y plancha.",
            "environment": "home"
        });

        let (name, value) = bearer(&ana);
        server
            .post("/routines")
            .add_header(name.clone(), value.clone())
            .json(&routine)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let (doc_name, doc_value) = bearer(&doc);
        server
            .post("/routines")
            .add_header(doc_name.clone(), doc_value.clone())
            .json(&routine)
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/routines")
            .add_header(doc_name, doc_value)
            .json(&json!({
                "title": "Rutina de la próxima semana",
                "description": "Todavía no debería verse en la lista.",
                "environment": "gym",
                "visible_from": (Utc::now() + Duration::days(7)).to_rfc3339()
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let visible: Vec<Value> = server
            .get("/routines")
            .add_header(name.clone(), value.clone())
            .await
            .json();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["title"], "Circuito en casa");

        let gym: Vec<Value> = server
            .get("/routines")
            .add_query_param("environment", "gym")
            .add_header(name, value)
            .await
            .json();
        assert!(gym.is_empty());

        Ok(())
    }
}
