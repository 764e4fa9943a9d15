//! AppointmentRepository - citas with a per-day capacity

use super::Read;
use crate::dtos::CreateAppointmentDTO;
use crate::entities::{Appointment, AppointmentStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const APPOINTMENT_COLUMNS: &str =
    "appointment_id, user_id, scheduled_at, status, notes, created_at";

pub struct AppointmentRepository {
    connection_pool: SqlitePool,
}

impl AppointmentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Books a cita only if its day still has room and its slot is free.
    ///
    /// Check and insert run as a single statement, so two concurrent bookings
    /// cannot both squeeze into the last place. `Ok(None)` means the day or
    /// the slot is taken. Cancelled citas do not count.
    pub async fn create_if_capacity(
        &self,
        data: &CreateAppointmentDTO,
        capacity: usize,
    ) -> Result<Option<Appointment>, Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments (user_id, scheduled_at, status, notes, created_at)
            SELECT ?1, ?2, ?3, ?4, ?5
            WHERE (
                SELECT COUNT(*) FROM appointments
                WHERE date(scheduled_at) = date(?2) AND status <> ?6
            ) < ?7
            AND NOT EXISTS (
                SELECT 1 FROM appointments
                WHERE datetime(scheduled_at) = datetime(?2) AND status <> ?6
            )
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.scheduled_at)
        .bind(AppointmentStatus::Pendiente)
        .bind(&data.notes)
        .bind(data.created_at)
        .bind(AppointmentStatus::Cancelada)
        .bind(capacity as i64)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Non-cancelled citas in `[from, until)`, ordered by time
    pub async fn list_active_between(
        &self,
        from: &DateTime<Utc>,
        until: &DateTime<Utc>,
    ) -> Result<Vec<Appointment>, Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS} FROM appointments
            WHERE datetime(scheduled_at) >= datetime(?1)
              AND datetime(scheduled_at) < datetime(?2)
              AND status <> ?3
            ORDER BY scheduled_at ASC
            "#
        ))
        .bind(from)
        .bind(until)
        .bind(AppointmentStatus::Cancelada)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Appointment>, Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE user_id = ? ORDER BY scheduled_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>, Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY scheduled_at ASC"
        ))
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn update_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments SET status = ? WHERE appointment_id = ? RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(status)
        .bind(appointment_id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)
    }
}

impl Read<Appointment, i64> for AppointmentRepository {
    async fn read(&self, id: &i64) -> Result<Option<Appointment>, Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appointment_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
