//! Visible day range and anchor navigation.

use chrono::{Duration, NaiveDate};

use crate::models::ui::{Navigation, ViewMode};
use crate::utils::date::{monday_of_week, shift_month_preserving_day};

/// Widths that render as a window centered on the anchor
pub const CENTERED_WIDTHS: [u8; 3] = [1, 3, 5];

pub const WEEK_LENGTH: i64 = 7;

/// Resolve the ordered days shown for `anchor` under `mode`.
///
/// Week and month modes show Monday..Sunday of the anchor's week unless
/// `week_days` is one of the centered widths (1, 3 or 5), in which case the
/// window is centered on the anchor. Any other width falls back to the
/// Monday-anchored week.
pub fn resolve_days(anchor: NaiveDate, mode: ViewMode, week_days: Option<u8>) -> Vec<NaiveDate> {
    match mode {
        ViewMode::Day => vec![anchor],
        ViewMode::Week | ViewMode::Month => match week_days.filter(|w| CENTERED_WIDTHS.contains(w)) {
            Some(width) => centered_window(anchor, width),
            None => monday_week(anchor),
        },
    }
}

fn monday_week(anchor: NaiveDate) -> Vec<NaiveDate> {
    let monday = monday_of_week(anchor);
    (0..WEEK_LENGTH).map(|offset| monday + Duration::days(offset)).collect()
}

fn centered_window(anchor: NaiveDate, width: u8) -> Vec<NaiveDate> {
    let half = i64::from(width / 2);
    (-half..=half).map(|offset| anchor + Duration::days(offset)).collect()
}

/// Move the anchor for a toolbar navigation request
pub fn navigate(anchor: NaiveDate, mode: ViewMode, navigation: Navigation) -> NaiveDate {
    match navigation {
        Navigation::Today(today) => today,
        Navigation::Previous => step(anchor, mode, -1),
        Navigation::Next => step(anchor, mode, 1),
    }
}

fn step(anchor: NaiveDate, mode: ViewMode, direction: i32) -> NaiveDate {
    match mode {
        ViewMode::Day => anchor + Duration::days(i64::from(direction)),
        ViewMode::Week => anchor + Duration::days(WEEK_LENGTH * i64::from(direction)),
        ViewMode::Month => shift_month_preserving_day(anchor, direction),
    }
}
