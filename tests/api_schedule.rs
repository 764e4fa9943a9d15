//! Integration tests for the agenda
//!
//! Exercised:
//! - GET/POST /schedule
//! - GET /schedule/appointments
//! - PATCH /schedule/appointments/{id}/status
//! - the moderator redirect away from scheduling
//! - `AppointmentRepository::create_if_capacity`, without the handler

mod common;

#[cfg(test)]
mod schedule_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use serde_json::{Value, json};
    use sqlx::SqlitePool;
    use vitanova_server::dtos::CreateAppointmentDTO;
    use vitanova_server::entities::{AppointmentStatus, Role};
    use vitanova_server::schedule::DAILY_CAPACITY;

    /// A day whose slots are all in the future
    fn booking_day() -> NaiveDate {
        (Utc::now() + Duration::days(3)).date_naive()
    }

    fn slot(day: NaiveDate, hour: u32) -> DateTime<Utc> {
        day.and_hms_opt(hour, 0, 0).unwrap().and_utc()
    }

    #[sqlx::test]
    async fn test_third_booking_of_the_day_is_rejected(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, bea) = login_as(&state, "bea", Role::Regular).await;
        let server = create_test_server(state);
        let day = booking_day();

        let (name, value) = bearer(&ana);
        server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(day, 10).to_rfc3339() }))
            .await
            .assert_status(StatusCode::CREATED);

        let (bea_name, bea_value) = bearer(&bea);
        server
            .post("/schedule")
            .add_header(bea_name.clone(), bea_value.clone())
            .json(&json!({ "scheduled_at": slot(day, 12).to_rfc3339(), "notes": "Primera visita" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/schedule")
            .add_header(bea_name, bea_value)
            .json(&json!({ "scheduled_at": slot(day, 15).to_rfc3339() }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let month = day.format("%Y-%m").to_string();
        let availability: Value = server
            .get("/schedule")
            .add_query_param("month", &month)
            .add_header(name, value)
            .await
            .json();
        assert_eq!(availability["capacity"], 2);
        let disabled = availability["disabled_days"].as_array().unwrap();
        assert!(disabled.contains(&json!(day.to_string())));
        let taken = availability["taken_slots"][day.to_string()].as_array().unwrap();
        assert_eq!(taken, &vec![json!("10:00"), json!("12:00")]);

        Ok(())
    }

    #[sqlx::test]
    async fn test_taken_slot_and_past_slot(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, bea) = login_as(&state, "bea", Role::Regular).await;
        let server = create_test_server(state);
        let day = booking_day();

        let (name, value) = bearer(&ana);
        server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(day, 9).to_rfc3339() }))
            .await
            .assert_status(StatusCode::CREATED);

        let (bea_name, bea_value) = bearer(&bea);
        server
            .post("/schedule")
            .add_header(bea_name, bea_value)
            .json(&json!({ "scheduled_at": slot(day, 9).to_rfc3339() }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let yesterday = (Utc::now() - Duration::days(1)).date_naive();
        server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(yesterday, 10).to_rfc3339() }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/schedule")
            .add_header(name, value)
            .json(&json!({ "scheduled_at": day.and_hms_opt(10, 30, 0).unwrap().and_utc().to_rfc3339() }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[sqlx::test]
    async fn test_cancelled_appointment_frees_the_day(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, ana) = login_as(&state, "ana", Role::Regular).await;
        let server = create_test_server(state);
        let day = booking_day();

        let (name, value) = bearer(&ana);
        let first: Value = server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(day, 10).to_rfc3339() }))
            .await
            .json();
        server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(day, 11).to_rfc3339() }))
            .await
            .assert_status(StatusCode::CREATED);

        let appointment_id = first["appointment_id"].as_i64().unwrap();
        let cancelled: Value = server
            .patch(&format!("/schedule/appointments/{appointment_id}/status"))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "status": "cancelada" }))
            .await
            .json();
        assert_eq!(cancelled["status"], "cancelada");

        server
            .patch(&format!("/schedule/appointments/{appointment_id}/status"))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "status": "cancelada" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .post("/schedule")
            .add_header(name, value)
            .json(&json!({ "scheduled_at": slot(day, 16).to_rfc3339() }))
            .await
            .assert_status(StatusCode::CREATED);

        Ok(())
    }

    #[sqlx::test]
    async fn test_professional_confirms_and_owner_is_notified(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (ana_id, ana) = login_as(&state, "ana", Role::Regular).await;
        let (_, doc) = login_as(&state, "doctora", Role::Professional).await;
        let server = create_test_server(state);

        let (name, value) = bearer(&ana);
        let booked: Value = server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(booking_day(), 17).to_rfc3339() }))
            .await
            .json();
        let appointment_id = booked["appointment_id"].as_i64().unwrap();
        assert_eq!(booked["status"], "pendiente");

        server
            .patch(&format!("/schedule/appointments/{appointment_id}/status"))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "status": "confirmada" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let (doc_name, doc_value) = bearer(&doc);
        let agenda: Vec<Value> = server
            .get("/schedule/appointments")
            .add_header(doc_name.clone(), doc_value.clone())
            .await
            .json();
        assert_eq!(agenda.len(), 1);
        assert_eq!(agenda[0]["user_id"], ana_id);

        server
            .patch(&format!("/schedule/appointments/{appointment_id}/status"))
            .add_header(doc_name, doc_value)
            .json(&json!({ "status": "confirmada" }))
            .await
            .assert_status_ok();

        let notifications: Vec<Value> = server
            .get("/notifications")
            .add_header(name, value)
            .await
            .json();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0]["message"].as_str().unwrap().contains("confirmada"));

        Ok(())
    }

    #[sqlx::test]
    async fn test_moderator_is_redirected_from_schedule(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, token) = login_as(&state, "mod", Role::Moderator).await;
        let server = create_test_server(state);

        let (name, value) = bearer(&token);
        let response = server
            .post("/schedule")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "scheduled_at": slot(booking_day(), 10).to_rfc3339() }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/moderation");

        let response = server.get("/schedule/appointments").add_header(name, value).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/moderation");

        Ok(())
    }

    #[sqlx::test]
    async fn test_invalid_month_query(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let (_, token) = login_as(&state, "ana", Role::Regular).await;
        let server = create_test_server(state);

        let (name, value) = bearer(&token);
        server
            .get("/schedule")
            .add_query_param("month", "2030-13")
            .add_header(name, value)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[sqlx::test]
    async fn test_capacity_is_enforced_by_the_insert(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let ana_id = seed_user(&state, "ana", Role::Regular).await;
        let day = booking_day();

        // the snapshot check is skipped: only the conditional insert decides
        let mut results = Vec::new();
        for hour in [9, 10, 11, 10] {
            let created = state
                .appointment
                .create_if_capacity(
                    &CreateAppointmentDTO {
                        user_id: ana_id,
                        scheduled_at: slot(day, hour),
                        notes: None,
                        created_at: Utc::now(),
                    },
                    DAILY_CAPACITY,
                )
                .await?;
            results.push(created.is_some());
        }
        assert_eq!(results, vec![true, true, false, false]);

        let active = state
            .appointment
            .list_active_between(&slot(day, 0), &slot(day.succ_opt().unwrap(), 0))
            .await?;
        assert_eq!(active.len(), DAILY_CAPACITY);

        Ok(())
    }

    #[sqlx::test]
    async fn test_insert_refuses_a_taken_slot(pool: SqlitePool) -> sqlx::Result<()> {
        let (state, _) = create_test_state(pool);
        let ana_id = seed_user(&state, "ana", Role::Regular).await;
        let bea_id = seed_user(&state, "bea", Role::Regular).await;
        let at = slot(booking_day(), 14);

        let book = |user_id| CreateAppointmentDTO {
            user_id,
            scheduled_at: at,
            notes: None,
            created_at: Utc::now(),
        };

        let first = state.appointment.create_if_capacity(&book(ana_id), DAILY_CAPACITY).await?;
        assert!(first.is_some());
        let second = state.appointment.create_if_capacity(&book(bea_id), DAILY_CAPACITY).await?;
        assert!(second.is_none());

        // a cancelled cita frees its slot
        state
            .appointment
            .update_status(first.unwrap().appointment_id, AppointmentStatus::Cancelada)
            .await?;
        let third = state.appointment.create_if_capacity(&book(bea_id), DAILY_CAPACITY).await?;
        assert_eq!(third.map(|a| a.user_id), Some(bea_id));

        Ok(())
    }
}
