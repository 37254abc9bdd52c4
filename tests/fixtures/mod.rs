// Test fixtures - reusable agenda data
// Provides consistent appointments, rosters and settings across test files

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use clinic_agenda::grid::AgendaData;
use clinic_agenda::models::appointment::{Appointment, AppointmentStatus};
use clinic_agenda::models::column::Professional;
use clinic_agenda::models::settings::{GridSettings, VisibleHours};
use clinic_agenda::models::ui::ViewMode;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, March 10 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    pub fn at(d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, minute, 0).unwrap()
    }
}

/// Sample appointments
pub mod appointments {
    use super::*;

    pub fn booked(id: &str, professional: &str, start: NaiveDateTime, minutes: u32) -> Appointment {
        Appointment::builder()
            .id(id)
            .start(start)
            .duration_minutes(minutes)
            .patient(format!("pat-{}", id), format!("Patient {}", id))
            .professional(professional, format!("Dr. {}", professional))
            .build()
            .unwrap()
    }

    pub fn in_box(id: &str, box_id: &str, start: NaiveDateTime, minutes: u32) -> Appointment {
        Appointment::builder()
            .id(id)
            .start(start)
            .duration_minutes(minutes)
            .professional("p1", "Dr. p1")
            .box_id(box_id)
            .build()
            .unwrap()
    }

    pub fn with_status(mut appointment: Appointment, status: AppointmentStatus) -> Appointment {
        appointment.status = status;
        appointment
    }
}

pub fn roster() -> Vec<Professional> {
    vec![
        Professional::new("p1", "Dr. p1"),
        Professional::new("p2", "Dr. p2"),
    ]
}

/// A small Monday agenda: two professionals, one spanning appointment,
/// one completed visit
pub fn monday_agenda() -> AgendaData {
    use appointments::*;
    use dates::at;

    AgendaData::new(vec![
        booked("a-1", "p1", at(10, 9, 0), 30),
        booked("a-2", "p1", at(10, 10, 0), 90),
        with_status(booked("a-3", "p2", at(10, 9, 30), 30), AppointmentStatus::Completed),
        booked("a-4", "p2", at(11, 9, 0), 30),
    ])
    .with_roster(roster())
}

/// Day view from 09:00 to 12:00 in 30-minute slots
pub fn day_settings() -> GridSettings {
    GridSettings {
        visible_hours: VisibleHours::new(9, 12),
        view_mode: ViewMode::Day,
        ..GridSettings::default()
    }
}

pub const SNAPSHOT_JSON: &str = r#"{
    "appointments": [
        {
            "id": "a-1",
            "start": "2025-03-10T09:00:00",
            "end": "2025-03-10T09:30:00",
            "duration_minutes": 30,
            "status": "confirmed",
            "patient": { "id": "pat-1", "name": "Ana Gil" },
            "professional": { "id": "p1", "name": "Dr. Vega" },
            "box_id": "3"
        },
        {
            "id": "a-2",
            "start": "2025-03-10T10:00:00",
            "end": "2025-03-10T11:00:00",
            "duration_minutes": 60,
            "patient": { "id": "pat-2" },
            "professional": { "id": "p2", "name": "Dr. Sol" },
            "treatment_id": "implant",
            "box_id": "1"
        },
        {
            "id": "a-3",
            "start": "2025-03-10T11:00:00",
            "end": "2025-03-10T11:30:00",
            "duration_minutes": 30,
            "patient": { "id": "pat-3" },
            "professional": { "id": "p1", "name": "Dr. Vega" },
            "box_id": "10"
        }
    ],
    "treatment_min_durations": { "implant": 45 }
}"#;
