//! Integration tests for private messaging and the optimistic chat timeline
//!
//! Exercised:
//! - GET/POST /messages
//! - GET/POST /messages/{conversation_id}
//! - PATCH /messages/{conversation_id}/read
//! - the realtime topic of a conversation
//! - send/receive through `LocalChatBackend`

mod common;

#[cfg(test)]
mod messages_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;
    use vitanova_server::chat::{
        Applied, Attachment, DeliveryStatus, LocalChatBackend, Timeline, receive, send_message,
    };
    use vitanova_server::chat::timeline::server_ref;
    use vitanova_server::entities::Role;

    #[sqlx::test]
    async fn test_send_echoes_client_ref(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, ana) = login_as(&state, "ana", Role::Regular).await;
        let (bea_id, bea) = login_as(&state, "bea", Role::Regular).await;
        let server = create_test_server(state.clone());

        let (name, value) = bearer(&ana);
        let conversation: Value = server
            .post("/messages")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "user_id": bea_id }))
            .await
            .json();
        let conversation_id = conversation["conversation_id"].as_i64().unwrap();
        assert_eq!(conversation["other_user_id"], bea_id);

        let mut topic = state.chats_online.subscribe(conversation_id);

        let response = server
            .post(&format!("/messages/{conversation_id}"))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "content": "¿Entrenamos mañana?", "client_ref": "tmp-1" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let sent: Value = response.json();
        assert_eq!(sent["client_ref"], "tmp-1");
        assert_eq!(sent["sender_id"], ana_id);

        let event = topic.recv().await.expect("Message was not published");
        assert_eq!(event.client_ref.as_deref(), Some("tmp-1"));
        assert_eq!(Some(event.message_id), sent["message_id"].as_i64());

        // the correlation id is not stored
        let (bea_name, bea_value) = bearer(&bea);
        let history: Value = server
            .get(&format!("/messages/{conversation_id}"))
            .add_header(bea_name, bea_value)
            .await
            .json();
        let messages = history["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].get("client_ref").is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_unread_flag_follows_reads(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, bea) = login_as(&state, "bea", Role::Regular).await;
        let server = create_test_server(state.clone());

        let (bea_name, bea_value) = bearer(&bea);
        let conversation: Value = server
            .post("/messages")
            .add_header(bea_name.clone(), bea_value.clone())
            .json(&json!({ "user_id": ana_id }))
            .await
            .json();
        let conversation_id = conversation["conversation_id"].as_i64().unwrap();

        server
            .post(&format!("/messages/{conversation_id}"))
            .add_header(bea_name.clone(), bea_value.clone())
            .json(&json!({ "content": "Hola Ana" }))
            .await
            .assert_status(StatusCode::CREATED);

        let (name, value) = bearer(&ana);
        let list: Vec<Value> = server.get("/messages").add_header(name.clone(), value.clone()).await.json();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["unread"], true);
        assert_eq!(list[0]["last_message"]["content"], "Hola Ana");

        // the sender never sees its own message as unread
        let list: Vec<Value> = server.get("/messages").add_header(bea_name, bea_value).await.json();
        assert_eq!(list[0]["unread"], false);

        server
            .patch(&format!("/messages/{conversation_id}/read"))
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let list: Vec<Value> = server.get("/messages").add_header(name.clone(), value.clone()).await.json();
        assert_eq!(list[0]["unread"], false);

        // offline recipients are notified
        let notifications: Vec<Value> = server.get("/notifications").add_header(name, value).await.json();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["link"], format!("/messages/{conversation_id}"));

        Ok(())
    }

    #[sqlx::test]
    async fn test_outsiders_cannot_use_a_conversation(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, _) = login_as(&state, "ana", Role::Regular).await;
        let (bea_id, _) = login_as(&state, "bea", Role::Regular).await;
        let (_, eve) = login_as(&state, "eve", Role::Regular).await;
        let conversation = state
            .conversation
            .find_or_create(ana_id, bea_id)
            .await
            .expect("Failed to create conversation");
        let server = create_test_server(state);

        let (name, value) = bearer(&eve);
        server
            .get(&format!("/messages/{}", conversation.conversation_id))
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .post(&format!("/messages/{}", conversation.conversation_id))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "content": "intrusa" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/messages/9999")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/messages")
            .add_header(name, value)
            .json(&json!({ "user_id": 9999 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        Ok(())
    }

    #[sqlx::test]
    async fn test_blank_message_is_rejected(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, ana) = login_as(&state, "ana", Role::Regular).await;
        let (bea_id, _) = login_as(&state, "bea", Role::Regular).await;
        let conversation = state
            .conversation
            .find_or_create(ana_id, bea_id)
            .await
            .expect("Failed to create conversation");
        let server = create_test_server(state);

        let (name, value) = bearer(&ana);
        server
            .post(&format!("/messages/{}", conversation.conversation_id))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "content": "   " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/messages")
            .add_header(name, value)
            .json(&json!({ "user_id": ana_id }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[sqlx::test]
    async fn test_optimistic_send_is_reconciled_once(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, store) = create_test_state(pool);
        let (ana_id, _) = login_as(&state, "ana", Role::Regular).await;
        let (bea_id, _) = login_as(&state, "bea", Role::Regular).await;
        let conversation = state
            .conversation
            .find_or_create(ana_id, bea_id)
            .await
            .expect("Failed to create conversation");
        let conversation_id = conversation.conversation_id;
        let mut topic = state.chats_online.subscribe(conversation_id);

        let ana_backend = LocalChatBackend::new(state.clone(), ana_id);
        let mut ana_timeline = Timeline::new(conversation_id, ana_id);
        let outcome = send_message(
            &ana_backend,
            &mut ana_timeline,
            "Mira mi plato",
            Some(Attachment {
                bytes: vec![1, 2, 3],
                content_type: "image/jpeg".to_string(),
            }),
        )
        .await;
        assert_eq!(outcome.status, DeliveryStatus::Delivered);
        assert_eq!(store.len(), 1);

        // the realtime echo arrives after the insert returned
        let event = topic.recv().await.expect("Message was not published");
        assert_eq!(event.client_ref.as_deref(), Some(outcome.client_ref.as_str()));
        assert_eq!(ana_timeline.apply_event(&event), Applied::Duplicate);
        assert_eq!(ana_timeline.len(), 1);
        let entry = &ana_timeline.entries()[0];
        assert_eq!(entry.server_id, Some(event.message_id));
        assert_eq!(entry.client_ref, server_ref(event.message_id));
        assert_eq!(entry.status, DeliveryStatus::Delivered);
        assert!(entry.image_path.is_some());

        // the other side receives it once and marks the thread read
        let bea_backend = LocalChatBackend::new(state.clone(), bea_id);
        let mut bea_timeline = Timeline::new(conversation_id, bea_id);
        assert_eq!(
            receive(&bea_backend, &mut bea_timeline, &event).await.unwrap(),
            Applied::Incoming
        );
        assert_eq!(
            receive(&bea_backend, &mut bea_timeline, &event).await.unwrap(),
            Applied::Duplicate
        );
        let stored = state
            .conversation
            .find_between(ana_id, bea_id)
            .await
            .expect("Failed to read conversation")
            .unwrap();
        assert!(!stored.unread_for(bea_id));

        Ok(())
    }

    #[sqlx::test]
    async fn test_failed_send_is_flagged(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, _) = login_as(&state, "ana", Role::Regular).await;
        let (bea_id, _) = login_as(&state, "bea", Role::Regular).await;
        let (eve_id, _) = login_as(&state, "eve", Role::Regular).await;
        let conversation = state
            .conversation
            .find_or_create(ana_id, bea_id)
            .await
            .expect("Failed to create conversation");

        // eve is not a participant, so the insert is refused
        let backend = LocalChatBackend::new(state.clone(), eve_id);
        let mut timeline = Timeline::new(conversation.conversation_id, eve_id);
        let outcome = send_message(&backend, &mut timeline, "hola", None).await;
        assert_eq!(outcome.status, DeliveryStatus::Failed);
        assert_eq!(
            timeline.find(&outcome.client_ref).unwrap().status,
            DeliveryStatus::Failed
        );

        Ok(())
    }
}
