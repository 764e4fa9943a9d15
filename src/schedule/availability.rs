//! Availability snapshot built from the active citas of a period

use super::DAILY_CAPACITY;
use crate::entities::{Appointment, AppointmentStatus};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Active citas bucketed by calendar day (UTC)
#[derive(Debug, Default, Clone)]
pub struct Availability {
    days: BTreeMap<NaiveDate, Vec<DateTime<Utc>>>,
}

impl Availability {
    /// Cancelled rows are ignored so their slot opens up again
    pub fn from_appointments<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Appointment>,
    {
        let mut days: BTreeMap<NaiveDate, Vec<DateTime<Utc>>> = BTreeMap::new();
        for row in rows {
            if row.status == AppointmentStatus::Cancelada {
                continue;
            }
            days.entry(row.scheduled_at.date_naive())
                .or_default()
                .push(row.scheduled_at);
        }
        for slots in days.values_mut() {
            slots.sort();
        }
        Self { days }
    }

    pub fn booked_on(&self, date: NaiveDate) -> usize {
        self.days.get(&date).map_or(0, Vec::len)
    }

    pub fn is_day_full(&self, date: NaiveDate) -> bool {
        self.booked_on(date) >= DAILY_CAPACITY
    }

    /// `"HH:MM"` labels already taken on `date`
    pub fn taken_slots(&self, date: NaiveDate) -> Vec<String> {
        self.days
            .get(&date)
            .map(|slots| slots.iter().map(|at| at.format("%H:%M").to_string()).collect())
            .unwrap_or_default()
    }

    /// Every day with at least one active cita, as served to the picker
    pub fn taken_by_day(&self) -> BTreeMap<NaiveDate, Vec<String>> {
        self.days
            .keys()
            .map(|date| (*date, self.taken_slots(*date)))
            .collect()
    }

    pub fn is_slot_available(&self, at: &DateTime<Utc>) -> bool {
        let date = at.date_naive();
        !self.is_day_full(date)
            && !self
                .days
                .get(&date)
                .is_some_and(|slots| slots.contains(at))
    }

    /// Days of `month` the picker must grey out: past days and full days
    pub fn disabled_days(&self, month: NaiveDate, today: NaiveDate) -> Vec<NaiveDate> {
        month_days(month)
            .filter(|date| *date < today || self.is_day_full(*date))
            .collect()
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    let start = month_start(date);
    let (year, month) = if start.month() == 12 {
        (start.year() + 1, 1)
    } else {
        (start.year(), start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start + Duration::days(31))
}

/// Parses a `YYYY-MM` month selector
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok()
}

fn month_days(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let end = next_month_start(date);
    month_start(date)
        .iter_days()
        .take_while(move |day| *day < end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cita(id: i64, at: DateTime<Utc>, status: AppointmentStatus) -> Appointment {
        Appointment {
            appointment_id: id,
            user_id: 1,
            scheduled_at: at,
            status,
            notes: None,
            created_at: at,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn two_active_citas_fill_the_day() {
        let rows = vec![
            cita(1, at(4, 9), AppointmentStatus::Pendiente),
            cita(2, at(4, 11), AppointmentStatus::Confirmada),
            cita(3, at(5, 9), AppointmentStatus::Pendiente),
        ];
        let availability = Availability::from_appointments(&rows);
        let day = at(4, 0).date_naive();

        assert!(availability.is_day_full(day));
        assert!(!availability.is_slot_available(&at(4, 15)));
        assert!(!availability.is_day_full(at(5, 0).date_naive()));
        assert_eq!(availability.taken_slots(day), vec!["09:00", "11:00"]);
    }

    #[test]
    fn cancelled_citas_free_their_slot() {
        let rows = vec![
            cita(1, at(4, 9), AppointmentStatus::Cancelada),
            cita(2, at(4, 11), AppointmentStatus::Pendiente),
        ];
        let availability = Availability::from_appointments(&rows);
        assert!(availability.is_slot_available(&at(4, 9)));
        assert!(!availability.is_slot_available(&at(4, 11)));
    }

    #[test]
    fn past_and_full_days_are_disabled() {
        let rows = vec![
            cita(1, at(20, 9), AppointmentStatus::Pendiente),
            cita(2, at(20, 10), AppointmentStatus::Pendiente),
        ];
        let availability = Availability::from_appointments(&rows);
        let today = NaiveDate::from_ymd_opt(2030, 3, 10).unwrap();
        let disabled = availability.disabled_days(today, today);

        assert_eq!(disabled.len(), 10);
        assert!(disabled.contains(&NaiveDate::from_ymd_opt(2030, 3, 20).unwrap()));
        assert!(!disabled.contains(&today));
    }

    #[test]
    fn month_bounds_wrap_the_year() {
        let december = parse_month("2030-12").unwrap();
        assert_eq!(next_month_start(december), NaiveDate::from_ymd_opt(2031, 1, 1).unwrap());
        assert!(parse_month("2030-13").is_none());
        assert_eq!(month_days(december).count(), 31);
    }
}
