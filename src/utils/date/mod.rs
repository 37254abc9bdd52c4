// Date utility functions
// Week/month arithmetic and "HH:MM" helpers shared by the grid

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

/// Monday of the week containing `date`. Sunday counts as day 7, so it
/// belongs to the week that started six days earlier.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().number_from_monday()) - 1;
    date - Duration::days(offset)
}

/// Shift by whole calendar months, clamping the day to the target month's length.
pub fn shift_month_preserving_day(current: NaiveDate, delta_months: i32) -> NaiveDate {
    let total_months = (current.year() * 12) + (current.month() as i32 - 1) + delta_months;
    let new_year = total_months.div_euclid(12);
    let new_month = total_months.rem_euclid(12) as u32 + 1;
    clamp_day(new_year, new_month, current.day()).unwrap_or(current)
}

fn clamp_day(year: i32, month: u32, desired_day: u32) -> Option<NaiveDate> {
    let max_day = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, desired_day.min(max_day))
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Format minutes since midnight as `HH:MM`
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes since midnight, ignoring seconds
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}
