//! Scheduling rules for citas: fixed hourly slots and a per-day capacity

pub mod availability;

pub use availability::Availability;

/// Maximum number of non-cancelled citas on one calendar day
pub const DAILY_CAPACITY: usize = 2;

/// First bookable hour (UTC)
pub const FIRST_SLOT_HOUR: u32 = 9;

/// Last bookable hour (UTC), inclusive
pub const LAST_SLOT_HOUR: u32 = 18;

/// Slot labels offered by the picker, `"09:00"` .. `"18:00"`
pub fn slot_labels() -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| format!("{hour:02}:00"))
        .collect()
}
