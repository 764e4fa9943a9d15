//! Agenda - availability snapshot, booking and status changes of citas

use super::notifications::notify_best_effort;
use crate::core::{AppError, AppState, Session, require_role};
use crate::dtos::{
    AppointmentDTO, AvailabilityDTO, AvailabilityQuery, BookAppointmentDTO, CreateAppointmentDTO,
    UpdateAppointmentStatusDTO,
};
use crate::entities::{AppointmentStatus, Role};
use crate::repositories::Read;
use crate::schedule::availability::{month_start, next_month_start, parse_month};
use crate::schedule::{Availability, DAILY_CAPACITY, slot_labels};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

fn day_start(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Days the picker must disable for the requested month, plus the taken slots
#[instrument(skip(state, _session, query))]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityDTO>, AppError> {
    let today = Utc::now().date_naive();
    let month = match query.month.as_deref() {
        Some(value) => parse_month(value)
            .ok_or_else(|| AppError::bad_request("Month must be formatted as YYYY-MM"))?,
        None => month_start(today),
    };

    let rows = state
        .appointment
        .list_active_between(&day_start(month), &day_start(next_month_start(month)))
        .await?;
    let availability = Availability::from_appointments(&rows);

    Ok(Json(AvailabilityDTO {
        capacity: DAILY_CAPACITY,
        slots: slot_labels(),
        disabled_days: availability.disabled_days(month, today),
        taken_slots: availability.taken_by_day(),
    }))
}

/// Books a cita. The day's capacity is enforced by the insert itself, so a
/// stale picker or a concurrent booking ends in 409 instead of a third cita.
#[instrument(skip(state, session, body), fields(user_id = session.user_id, at = %body.scheduled_at))]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<BookAppointmentDTO>,
) -> Result<(StatusCode, Json<AppointmentDTO>), AppError> {
    body.validate()?;

    let now = Utc::now();
    if body.scheduled_at <= now {
        return Err(AppError::bad_request("Appointments must be in the future"));
    }

    let day = body.scheduled_at.date_naive();
    let rows = state
        .appointment
        .list_active_between(&day_start(day), &day_start(day.succ_opt().unwrap_or(day)))
        .await?;
    let availability = Availability::from_appointments(&rows);
    if availability.is_day_full(day) {
        warn!("Booking on a full day");
        return Err(AppError::conflict("This day is fully booked"));
    }
    if !availability.is_slot_available(&body.scheduled_at) {
        warn!("Booking on a taken slot");
        return Err(AppError::conflict("This time slot is already taken"));
    }

    let created = state
        .appointment
        .create_if_capacity(
            &CreateAppointmentDTO {
                user_id: session.user_id,
                scheduled_at: body.scheduled_at,
                notes: body.notes,
                created_at: now,
            },
            DAILY_CAPACITY,
        )
        .await?;

    match created {
        Some(appointment) => {
            info!(appointment_id = appointment.appointment_id, "Appointment booked");
            Ok((StatusCode::CREATED, Json(AppointmentDTO::from(appointment))))
        }
        None => {
            warn!("Booking lost the race for the last place");
            Err(AppError::conflict("This day is fully booked"))
        }
    }
}

/// Own citas; professionals see the whole agenda
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<AppointmentDTO>>, AppError> {
    let rows = match session.role {
        Role::Professional => state.appointment.list_all().await?,
        _ => state.appointment.list_for_user(session.user_id).await?,
    };
    Ok(Json(rows.into_iter().map(AppointmentDTO::from).collect()))
}

/// Owners may cancel their cita; professionals may confirm or cancel any
#[instrument(skip(state, session, body), fields(user_id = session.user_id, status = ?body.status))]
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(appointment_id): Path<i64>,
    Json(body): Json<UpdateAppointmentStatusDTO>,
) -> Result<Json<AppointmentDTO>, AppError> {
    let appointment = state
        .appointment
        .read(&appointment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment not found"))?;

    match body.status {
        AppointmentStatus::Pendiente => {
            return Err(AppError::bad_request("An appointment cannot go back to pending"));
        }
        AppointmentStatus::Confirmada => require_role(&session, &[Role::Professional])?,
        AppointmentStatus::Cancelada => {
            if appointment.user_id != session.user_id {
                require_role(&session, &[Role::Professional])?;
            }
        }
    }

    if appointment.status == AppointmentStatus::Cancelada {
        return Err(AppError::conflict("The appointment is already cancelled"));
    }

    let updated = state
        .appointment
        .update_status(appointment_id, body.status)
        .await?;

    if updated.user_id != session.user_id {
        let verb = match updated.status {
            AppointmentStatus::Confirmada => "confirmada",
            _ => "cancelada",
        };
        notify_best_effort(
            &state,
            updated.user_id,
            format!(
                "Tu cita del {} ha sido {verb}",
                updated.scheduled_at.format("%d/%m/%Y %H:%M")
            ),
            Some("/schedule/appointments".to_string()),
        )
        .await;
    }

    info!(appointment_id, "Appointment status updated");
    Ok(Json(AppointmentDTO::from(updated)))
}
