//! Appointment placement into grid cells.
//!
//! Two occupancy tests are supported:
//! - exact: an appointment shows only in the slot whose hour and minute equal
//!   its start. An appointment starting mid-slot is not shown at all.
//! - overlap: an appointment occupies every slot whose interval intersects
//!   `[start, end)`, so multi-slot appointments appear in each row they span.
//!
//! Within a cell, appointments keep their order in the source collection.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::time_slots::TimeSlot;
use crate::models::appointment::Appointment;
use crate::models::column::{Column, GroupBy};
use crate::utils::date::minutes_of_day;

/// Position of a cell in the grid skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub day: NaiveDate,
    pub column: usize,
    pub slot: usize,
}

/// One appointment inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEntry {
    /// Index into the source appointment collection
    pub position: usize,
    /// False when the appointment started in an earlier slot and continues here
    pub starts_here: bool,
}

/// Exact-start test used by the full grid
pub fn starts_at_slot(appointment: &Appointment, day: NaiveDate, slot: &TimeSlot) -> bool {
    appointment.start.date() == day
        && appointment.start.hour() == slot.hour()
        && appointment.start.minute() == slot.minute()
}

/// Appointments shown in one cell of the full grid, in source order
pub fn appointments_in_cell<'a>(
    appointments: &'a [Appointment],
    day: NaiveDate,
    column_id: &str,
    slot: &TimeSlot,
    group_by: GroupBy,
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|appt| appt.column_id(group_by) == column_id && starts_at_slot(appt, day, slot))
        .collect()
}

fn intervals_overlap(
    start: NaiveDateTime,
    end: NaiveDateTime,
    other_start: NaiveDateTime,
    other_end: NaiveDateTime,
) -> bool {
    start < other_end && other_start < end
}

/// Appointments whose `[start, end)` intersects the slot on `day`, in source order
pub fn appointments_overlapping(
    appointments: &[Appointment],
    day: NaiveDate,
    column_id: &str,
    slot: &TimeSlot,
    slot_minutes: u32,
    group_by: GroupBy,
) -> Vec<CellEntry> {
    let (slot_start, slot_end) = slot.interval_on(day, slot_minutes);

    appointments
        .iter()
        .enumerate()
        .filter(|(_, appt)| appt.column_id(group_by) == column_id)
        .filter(|(_, appt)| intervals_overlap(appt.start, appt.end, slot_start, slot_end))
        .map(|(position, appt)| CellEntry {
            position,
            starts_here: appt.start >= slot_start && appt.start < slot_end,
        })
        .collect()
}

/// Cell contents for the full grid, built once per render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellIndex {
    cells: HashMap<CellKey, Vec<usize>>,
    unplaced: Vec<usize>,
}

impl CellIndex {
    /// Place appointments with the exact-start rule.
    ///
    /// Appointments on days outside `days` are ignored. Appointments on a
    /// visible day that match no column or no slot boundary are recorded as
    /// unplaced.
    pub fn build_exact(
        appointments: &[Appointment],
        days: &[NaiveDate],
        columns: &[Column],
        slots: &[TimeSlot],
        group_by: GroupBy,
    ) -> Self {
        let visible_days: HashSet<NaiveDate> = days.iter().copied().collect();
        let column_lookup: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.id.as_str(), index))
            .collect();
        let slot_lookup: HashMap<u32, usize> = slots.iter().map(|slot| (slot.minutes, slot.index)).collect();

        let mut index = CellIndex::default();
        for (position, appt) in appointments.iter().enumerate() {
            let day = appt.start_date();
            if !visible_days.contains(&day) {
                continue;
            }

            let column = column_lookup.get(appt.column_id(group_by));
            let slot = slot_lookup.get(&minutes_of_day(appt.start.time()));

            match (column, slot) {
                (Some(&column), Some(&slot)) => index
                    .cells
                    .entry(CellKey { day, column, slot })
                    .or_default()
                    .push(position),
                _ => index.unplaced.push(position),
            }
        }

        if !index.unplaced.is_empty() {
            log::debug!(
                "{} appointment(s) on visible days do not start on a slot boundary of a visible column",
                index.unplaced.len()
            );
        }

        index
    }

    /// Source positions of the appointments in a cell
    pub fn get(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Visible-day appointments that could not be placed
    pub fn unplaced(&self) -> &[usize] {
        &self.unplaced
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn placed_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}

/// Rendered block height: `round(duration / slot * row_height)`
pub fn block_height(duration_minutes: u32, slot_minutes: u32, row_height: f32) -> f32 {
    if slot_minutes == 0 {
        return 0.0;
    }
    (duration_minutes as f32 / slot_minutes as f32 * row_height).round()
}

/// Vertical offset of an appointment's start relative to a slot's top edge
pub fn block_top_offset(
    start: NaiveDateTime,
    slot_start: NaiveDateTime,
    slot_minutes: u32,
    row_height: f32,
) -> f32 {
    if slot_minutes == 0 {
        return 0.0;
    }
    let minutes = (start - slot_start).num_minutes() as f32;
    (minutes / slot_minutes as f32 * row_height).round()
}

/// Position of a slot relative to the current instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTiming {
    Past,
    Current,
    Future,
}

/// Classify a slot against an explicit `now`
pub fn slot_timing(day: NaiveDate, slot: &TimeSlot, slot_minutes: u32, now: NaiveDateTime) -> SlotTiming {
    let (start, end) = slot.interval_on(day, slot_minutes);
    if end <= now {
        SlotTiming::Past
    } else if start <= now {
        SlotTiming::Current
    } else {
        SlotTiming::Future
    }
}
