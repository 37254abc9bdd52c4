//! Time slot generation for the agenda grid.
//!
//! A slot is a quantized point in the visible hour window. The full slot
//! list is a pure function of `(visible_hours, slot_minutes)`; callers keep
//! it in a [`Memo`](super::memo::Memo) rather than regenerating it per cell.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::settings::{VisibleHours, ALLOWED_SLOT_DURATIONS};
use crate::utils::date::{format_hhmm, time_from_minutes};

/// One row of the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub index: usize,
    /// Minutes since midnight
    pub minutes: u32,
    /// `HH:MM`
    pub label: String,
}

impl TimeSlot {
    pub fn new(index: usize, minutes: u32) -> Self {
        Self {
            index,
            minutes,
            label: format_hhmm(minutes),
        }
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    pub fn time(&self) -> NaiveTime {
        time_from_minutes(self.minutes).unwrap_or(NaiveTime::MIN)
    }

    pub fn start_on(&self, day: NaiveDate) -> NaiveDateTime {
        day.and_time(self.time())
    }

    /// `[start, end)` of this slot on `day`
    pub fn interval_on(&self, day: NaiveDate, slot_minutes: u32) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start_on(day);
        (start, start + chrono::Duration::minutes(i64::from(slot_minutes)))
    }
}

pub fn is_valid_slot_duration(minutes: u32) -> bool {
    ALLOWED_SLOT_DURATIONS.contains(&minutes)
}

/// Generate the ordered slot labels covering `[start*60, end*60)`.
///
/// The count is `floor((end - start) * 60 / slot_minutes)`. Malformed input
/// (inverted or out-of-day hours, a duration outside 10/15/30) yields an
/// empty sequence instead of an error.
pub fn generate_time_slots(hours: VisibleHours, slot_minutes: u32) -> Vec<TimeSlot> {
    if !hours.is_valid() || !is_valid_slot_duration(slot_minutes) {
        log::debug!(
            "Empty slot sequence for hours {}..{} at {} min",
            hours.start,
            hours.end,
            slot_minutes
        );
        return Vec::new();
    }

    let first = hours.start * 60;
    let count = ((hours.end - hours.start) * 60 / slot_minutes) as usize;

    (0..count)
        .map(|index| TimeSlot::new(index, first + index as u32 * slot_minutes))
        .collect()
}

/// Floor a time to the slot boundary, in minutes since midnight
pub fn floor_to_slot(minutes: u32, slot_minutes: u32) -> u32 {
    if slot_minutes == 0 {
        return minutes;
    }
    minutes - minutes % slot_minutes
}

/// Find a slot by its `HH:MM` label
pub fn slot_by_label<'a>(slots: &'a [TimeSlot], label: &str) -> Option<&'a TimeSlot> {
    let label = label.trim();
    slots.iter().find(|slot| slot.label == label)
}
