//! Column derivation for the agenda grid.
//!
//! Columns are keyed either by professional or by box. They are recomputed
//! whenever the appointment set, the roster or the grouping changes.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::appointment::Appointment;
use crate::models::column::{Column, GroupBy, Professional};

/// Resolve the ordered columns for the current grouping mode.
///
/// Box mode always yields at least one column: when no appointment carries
/// a box, a synthetic "unassigned" column is returned. Professional mode
/// uses a non-empty roster verbatim and otherwise derives professionals from
/// the appointments in first-seen order.
pub fn resolve_columns(
    group_by: GroupBy,
    appointments: &[Appointment],
    roster: Option<&[Professional]>,
) -> Vec<Column> {
    match group_by {
        GroupBy::Box => box_columns(appointments),
        GroupBy::Professional => professional_columns(appointments, roster),
    }
}

fn box_columns(appointments: &[Appointment]) -> Vec<Column> {
    let mut seen = HashSet::new();
    let mut ids: Vec<&str> = appointments
        .iter()
        .filter_map(Appointment::assigned_box)
        .filter(|id| seen.insert(*id))
        .collect();

    if ids.is_empty() {
        return vec![Column::unassigned_box()];
    }

    ids.sort_by(|a, b| compare_box_ids(a, b));
    ids.into_iter().map(Column::boxed).collect()
}

fn professional_columns(appointments: &[Appointment], roster: Option<&[Professional]>) -> Vec<Column> {
    if let Some(roster) = roster.filter(|roster| !roster.is_empty()) {
        return roster.iter().map(Professional::to_column).collect();
    }

    let mut seen = HashSet::new();
    appointments
        .iter()
        .filter(|appt| seen.insert(appt.professional.id.as_str()))
        .map(|appt| Column::professional(appt.professional.id.clone(), appt.professional.label()))
        .collect()
}

/// Order box identifiers numerically when both parse as integers, otherwise
/// case-insensitively with the raw string as tie-break.
pub fn compare_box_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}
