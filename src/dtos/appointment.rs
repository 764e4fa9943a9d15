//! Appointment DTOs - scheduling picker and availability snapshot

use crate::entities::{Appointment, AppointmentStatus};
use crate::schedule::{FIRST_SLOT_HOUR, LAST_SLOT_HOUR};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppointmentDTO {
    pub appointment_id: i64,
    pub user_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentDTO {
    fn from(value: Appointment) -> Self {
        Self {
            appointment_id: value.appointment_id,
            user_id: value.user_id,
            scheduled_at: value.scheduled_at,
            status: value.status,
            notes: value.notes,
            created_at: value.created_at,
        }
    }
}

/// Scheduling picker form
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct BookAppointmentDTO {
    #[validate(custom(function = "validate_slot"))]
    pub scheduled_at: DateTime<Utc>,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Insert payload for the appointments table
#[derive(Debug, Clone)]
pub struct CreateAppointmentDTO {
    pub user_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateAppointmentStatusDTO {
    pub status: AppointmentStatus,
}

/// What the calendar needs to disable days and time slots
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AvailabilityDTO {
    pub capacity: usize,
    pub slots: Vec<String>,
    pub disabled_days: Vec<NaiveDate>,
    pub taken_slots: BTreeMap<NaiveDate, Vec<String>>,
}

fn validate_slot(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    let on_the_hour = value.minute() == 0 && value.second() == 0 && value.nanosecond() == 0;
    if on_the_hour && (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&value.hour()) {
        Ok(())
    } else {
        Err(ValidationError::new("slot")
            .with_message(Cow::Borrowed("Appointments start on the hour between 09:00 and 18:00")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn picker_accepts_only_listed_slots() {
        let ok = BookAppointmentDTO {
            scheduled_at: Utc.with_ymd_and_hms(2030, 3, 4, 10, 0, 0).unwrap(),
            notes: None,
        };
        assert!(ok.validate().is_ok());

        let off_hour = BookAppointmentDTO {
            scheduled_at: Utc.with_ymd_and_hms(2030, 3, 4, 10, 30, 0).unwrap(),
            notes: None,
        };
        assert!(off_hour.validate().is_err());

        let night = BookAppointmentDTO {
            scheduled_at: Utc.with_ymd_and_hms(2030, 3, 4, 21, 0, 0).unwrap(),
            notes: None,
        };
        assert!(night.validate().is_err());
    }
}
