// Property-based tests for the agenda grid
// Slot generation, column resolution, placement, resize floor and drag gating

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clinic_agenda::grid::columns::resolve_columns;
use clinic_agenda::grid::drag::{DragController, DragOutcome, DropTarget, Role};
use clinic_agenda::grid::placement::CellIndex;
use clinic_agenda::grid::resize::{ResizeController, ResizeGeometry, ResizeOutcome};
use clinic_agenda::grid::time_slots::generate_time_slots;
use clinic_agenda::grid::Point;
use clinic_agenda::models::appointment::{Appointment, AppointmentStatus};
use clinic_agenda::models::column::{Column, GroupBy};
use clinic_agenda::models::settings::VisibleHours;
use clinic_agenda::utils::date::format_hhmm;
use proptest::prelude::*;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn start_at(day_offset: i64, minutes: u32) -> NaiveDateTime {
    base_day().and_hms_opt(0, 0, 0).unwrap() + Duration::days(day_offset) + Duration::minutes(i64::from(minutes))
}

fn appointment(id: usize, start: NaiveDateTime, minutes: u32, professional: &str, box_id: Option<String>) -> Appointment {
    let mut builder = Appointment::builder()
        .id(format!("a-{}", id))
        .start(start)
        .duration_minutes(minutes)
        .professional(professional, professional);
    if let Some(box_id) = box_id {
        builder = builder.box_id(box_id);
    }
    builder.build().unwrap()
}

prop_compose! {
    fn arb_appointments()(
        raw in prop::collection::vec(
            (0i64..7, 0u32..96, 1u32..180, 0usize..4, prop::option::of("[0-9]{1,3}|[a-c]")),
            0..40,
        )
    ) -> Vec<Appointment> {
        raw.into_iter()
            .enumerate()
            .map(|(id, (day, quarter, minutes, professional, box_id))| {
                appointment(id, start_at(day, quarter * 15), minutes, &format!("p{}", professional), box_id)
            })
            .collect()
    }
}

fn slot_duration() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![10u32, 15, 30])
}

proptest! {
    #[test]
    fn prop_slot_count_and_order(start in 0u32..24, span in 1u32..=24, duration in slot_duration()) {
        let end = (start + span).min(24);
        prop_assume!(end > start);

        let slots = generate_time_slots(VisibleHours::new(start, end), duration);
        prop_assert_eq!(slots.len() as u32, (end - start) * 60 / duration);
        prop_assert!(slots.windows(2).all(|pair| pair[0].minutes < pair[1].minutes));
        for slot in &slots {
            prop_assert_eq!(slot.label.len(), 5);
            prop_assert_eq!(slot.label.as_bytes()[2], b':');
            prop_assert_eq!(&slot.label, &format_hhmm(slot.minutes));
        }
    }

    #[test]
    fn prop_box_mode_has_a_column(appointments in arb_appointments()) {
        let columns = resolve_columns(GroupBy::Box, &appointments, None);
        prop_assert!(!columns.is_empty());
    }

    #[test]
    fn prop_placement_is_idempotent(appointments in arb_appointments(), duration in slot_duration()) {
        let days: Vec<NaiveDate> = (0..7).map(|d| base_day() + Duration::days(d)).collect();
        let slots = generate_time_slots(VisibleHours::new(0, 24), duration);
        let columns: Vec<Column> = resolve_columns(GroupBy::Professional, &appointments, None);

        let first = CellIndex::build_exact(&appointments, &days, &columns, &slots, GroupBy::Professional);
        let second = CellIndex::build_exact(&appointments, &days, &columns, &slots, GroupBy::Professional);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.placed_count() + first.unplaced().len(), appointments.len());
    }

    #[test]
    fn prop_resize_respects_minimum(
        original in 1u32..240,
        min_duration in 5u32..90,
        moves in prop::collection::vec(-600.0f32..600.0, 1..6),
    ) {
        let appt = appointment(0, start_at(0, 9 * 60), original, "p1", None);
        let mut resize = ResizeController::new(ResizeGeometry::new(60.0, 30));
        resize.begin(&appt, 0.0, min_duration, false).unwrap();
        for y in moves {
            resize.update(y, &[]);
        }

        if let Some(ResizeOutcome::Committed { duration_minutes, .. }) = resize.finish() {
            prop_assert!(duration_minutes >= min_duration);
        }
    }

    #[test]
    fn prop_terminal_appointments_never_arm(
        cancelled in any::<bool>(),
        moves in prop::collection::vec((-300.0f32..300.0, -300.0f32..300.0), 0..5),
    ) {
        let status = if cancelled { AppointmentStatus::Cancelled } else { AppointmentStatus::Completed };
        let mut appt = appointment(0, start_at(0, 9 * 60), 30, "p1", None);
        appt.status = status;

        let mut drag = DragController::new(8.0, Role::parse("admin"));
        prop_assert!(drag.pointer_down(&appt, GroupBy::Professional, Point::new(0.0, 0.0), false).is_err());
        for (x, y) in moves {
            drag.pointer_move(Point::new(x, y), None);
            prop_assert!(!drag.is_active());
        }
        prop_assert_eq!(drag.pointer_up(Some(DropTarget::cell(base_day(), "10:00", "p1"))), None);
    }

    #[test]
    fn prop_front_desk_never_reassigns_professional(
        origin in 0usize..5,
        shift in 1usize..5,
        quarter in 28u32..80,
        day_offset in 0i64..7,
    ) {
        let from = format!("p{}", origin);
        let to = format!("p{}", origin + shift);
        let appt = appointment(0, start_at(0, 9 * 60), 30, &from, None);
        let target_day = base_day() + Duration::days(day_offset);

        let mut drag = DragController::new(8.0, Role::FrontDesk);
        drag.pointer_down(&appt, GroupBy::Professional, Point::new(0.0, 0.0), false).unwrap();
        drag.pointer_move(Point::new(100.0, 100.0), None);
        let outcome = drag.pointer_up(Some(DropTarget::cell(target_day, format_hhmm(quarter * 15), to)));

        prop_assert!(!matches!(outcome, Some(DragOutcome::Dropped(_))));
    }
}
