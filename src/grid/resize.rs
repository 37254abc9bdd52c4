// Appointment Resize System
//
// Bottom-edge drag that edits an appointment's duration.
// idle -> resizing -> committing | cancelled
//
// Sessions are purely local: nothing outside the controller sees the live
// candidate duration until the pointer is released.

use chrono::{Duration, NaiveDateTime};

use super::error::InteractionRejection;
use super::placement::block_height;
use crate::models::appointment::Appointment;

/// Pixel/minute conversion for the grid being resized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGeometry {
    pub row_height: f32,
    pub slot_minutes: u32,
}

impl ResizeGeometry {
    pub fn new(row_height: f32, slot_minutes: u32) -> Self {
        Self {
            row_height,
            slot_minutes,
        }
    }

    /// `round(delta_pixels / (row_height / slot_minutes))`
    pub fn delta_minutes(&self, delta_pixels: f32) -> i64 {
        if self.slot_minutes == 0 || self.row_height.is_nan() || self.row_height <= 0.0 {
            return 0;
        }
        let pixels_per_minute = self.row_height / self.slot_minutes as f32;
        (delta_pixels / pixels_per_minute).round() as i64
    }

    pub fn height_for(&self, duration_minutes: u32) -> f32 {
        block_height(duration_minutes, self.slot_minutes, self.row_height)
    }
}

/// Context for an active resize operation
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub appointment_id: String,
    pub start: NaiveDateTime,
    /// Pointer y at resize start
    pub origin_y: f32,
    pub original_duration: u32,
    /// Last accepted duration
    pub candidate_duration: u32,
    pub min_duration: u32,
}

impl ResizeSession {
    pub fn candidate_end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.candidate_duration))
    }

    pub fn is_dirty(&self) -> bool {
        self.candidate_duration != self.original_duration
    }
}

/// Result of one pointer move while resizing
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeUpdate {
    /// Candidate accepted; block should render at `height`
    Accepted { duration_minutes: u32, height: f32 },
    /// Shrink refused; block keeps its last valid height
    Rejected {
        rejection: InteractionRejection,
        duration_minutes: u32,
        height: f32,
    },
}

/// How a resize session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Duration changed; the controller should persist `duration_minutes`
    Committed {
        appointment_id: String,
        duration_minutes: u32,
    },
    /// Released at the original duration; no callback fires
    Unchanged { appointment_id: String },
    Cancelled { appointment_id: String },
}

/// First neighbor whose interval strictly contains `new_end`.
///
/// This only looks at where the new end lands. A shrunk interval that
/// fully contains a neighbor without ending inside it is not reported.
pub fn shrink_conflict<'a>(
    appointment_id: &str,
    new_end: NaiveDateTime,
    neighbors: &[&'a Appointment],
) -> Option<&'a Appointment> {
    neighbors
        .iter()
        .copied()
        .filter(|other| other.id != appointment_id)
        .find(|other| other.start < new_end && new_end < other.end)
}

/// Owns the resize state machine for the grid
#[derive(Debug)]
pub struct ResizeController {
    geometry: ResizeGeometry,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new(geometry: ResizeGeometry) -> Self {
        Self {
            geometry,
            session: None,
        }
    }

    pub fn geometry(&self) -> ResizeGeometry {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: ResizeGeometry) {
        self.geometry = geometry;
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_resizing(&self, appointment_id: &str) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.appointment_id == appointment_id)
    }

    /// Start resizing from a pointer-down on the block's bottom edge.
    ///
    /// Refused for completed/cancelled appointments, while a drag is in
    /// progress, or while another resize is active.
    pub fn begin(
        &mut self,
        appointment: &Appointment,
        pointer_y: f32,
        min_duration: u32,
        drag_active: bool,
    ) -> Result<&ResizeSession, InteractionRejection> {
        if drag_active || self.session.is_some() {
            return Err(InteractionRejection::Busy);
        }

        if appointment.is_terminal() {
            return Err(InteractionRejection::TerminalStatus {
                appointment_id: appointment.id.clone(),
                status: appointment.status,
            });
        }

        log::debug!(
            "Resize started for appointment {} at {} min",
            appointment.id,
            appointment.duration_minutes
        );

        Ok(&*self.session.insert(ResizeSession {
            appointment_id: appointment.id.clone(),
            start: appointment.start,
            origin_y: pointer_y,
            original_duration: appointment.duration_minutes,
            candidate_duration: appointment.duration_minutes,
            min_duration,
        }))
    }

    /// Feed a pointer move. `neighbors` are the appointments occupying the
    /// same cell as the resized block. Returns `None` when idle.
    pub fn update(&mut self, pointer_y: f32, neighbors: &[&Appointment]) -> Option<ResizeUpdate> {
        let geometry = self.geometry;
        let session = self.session.as_mut()?;

        let delta = geometry.delta_minutes(pointer_y - session.origin_y);
        let raw = i64::from(session.original_duration) + delta;
        let candidate = raw.max(i64::from(session.min_duration)).clamp(0, i64::from(u32::MAX)) as u32;

        if candidate < session.original_duration {
            let new_end = session.start + Duration::minutes(i64::from(candidate));
            if let Some(neighbor) = shrink_conflict(&session.appointment_id, new_end, neighbors) {
                log::debug!(
                    "Shrink of {} to {} min rejected: ends inside {}",
                    session.appointment_id,
                    candidate,
                    neighbor.id
                );
                return Some(ResizeUpdate::Rejected {
                    rejection: InteractionRejection::ShrinkConflict {
                        appointment_id: session.appointment_id.clone(),
                        candidate_minutes: candidate,
                        neighbor_id: neighbor.id.clone(),
                    },
                    duration_minutes: session.candidate_duration,
                    height: geometry.height_for(session.candidate_duration),
                });
            }
        }

        session.candidate_duration = candidate;
        Some(ResizeUpdate::Accepted {
            duration_minutes: candidate,
            height: geometry.height_for(candidate),
        })
    }

    /// Pointer released: commit when the duration changed
    pub fn finish(&mut self) -> Option<ResizeOutcome> {
        let session = self.session.take()?;
        let appointment_id = session.appointment_id.clone();

        if session.is_dirty() {
            log::info!(
                "Resize committed for {}: {} -> {} min",
                appointment_id,
                session.original_duration,
                session.candidate_duration
            );
            Some(ResizeOutcome::Committed {
                appointment_id,
                duration_minutes: session.candidate_duration,
            })
        } else {
            Some(ResizeOutcome::Unchanged { appointment_id })
        }
    }

    /// Abandon the session, reverting to the committed duration
    pub fn cancel(&mut self) -> Option<ResizeOutcome> {
        let session = self.session.take()?;
        log::debug!("Resize cancelled for {}", session.appointment_id);
        Some(ResizeOutcome::Cancelled {
            appointment_id: session.appointment_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::AppointmentStatus;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn appt(id: &str, hour: u32, minute: u32, minutes: u32) -> Appointment {
        Appointment::builder()
            .id(id)
            .start(at(hour, minute))
            .duration_minutes(minutes)
            .professional("p1", "Dr. Vega")
            .build()
            .unwrap()
    }

    fn controller() -> ResizeController {
        ResizeController::new(ResizeGeometry::new(60.0, 30))
    }

    #[test]
    fn test_delta_minutes_rounding() {
        let geometry = ResizeGeometry::new(60.0, 30);
        assert_eq!(geometry.delta_minutes(60.0), 30);
        assert_eq!(geometry.delta_minutes(-80.0), -40);
        assert_eq!(geometry.delta_minutes(3.0), 2);
        assert_eq!(ResizeGeometry::new(0.0, 30).delta_minutes(50.0), 0);
        assert_eq!(ResizeGeometry::new(f32::NAN, 30).delta_minutes(50.0), 0);
    }

    #[test]
    fn test_grow_and_commit() {
        let target = appt("a", 10, 0, 30);
        let mut resize = controller();
        resize.begin(&target, 100.0, 15, false).unwrap();

        let update = resize.update(160.0, &[]).unwrap();
        assert_eq!(update, ResizeUpdate::Accepted { duration_minutes: 60, height: 120.0 });

        assert_eq!(
            resize.finish(),
            Some(ResizeOutcome::Committed {
                appointment_id: "a".to_string(),
                duration_minutes: 60
            })
        );
        assert!(!resize.is_active());
    }

    #[test]
    fn test_release_without_change_is_unchanged() {
        let target = appt("a", 10, 0, 30);
        let mut resize = controller();
        resize.begin(&target, 100.0, 15, false).unwrap();
        resize.update(130.0, &[]);
        resize.update(100.0, &[]);
        assert_eq!(
            resize.finish(),
            Some(ResizeOutcome::Unchanged { appointment_id: "a".to_string() })
        );
    }

    #[test]
    fn test_duration_never_below_minimum() {
        let target = appt("a", 10, 0, 30);
        let mut resize = controller();
        resize.begin(&target, 100.0, 20, false).unwrap();

        let update = resize.update(-500.0, &[]).unwrap();
        assert_eq!(update, ResizeUpdate::Accepted { duration_minutes: 20, height: 40.0 });
        assert_eq!(
            resize.finish(),
            Some(ResizeOutcome::Committed {
                appointment_id: "a".to_string(),
                duration_minutes: 20
            })
        );
    }

    #[test]
    fn test_shrink_ending_inside_neighbor_is_rejected() {
        let target = appt("a", 10, 0, 60);
        let neighbor = appt("b", 10, 0, 45);
        let mut resize = controller();
        resize.begin(&target, 200.0, 15, false).unwrap();

        // -80px at 2px/min = -40 min -> candidate 20 min, ending 10:20 inside b
        let update = resize.update(120.0, &[&target, &neighbor]).unwrap();
        match update {
            ResizeUpdate::Rejected { rejection, duration_minutes, height } => {
                assert_eq!(duration_minutes, 60);
                assert_eq!(height, 120.0);
                assert!(matches!(rejection, InteractionRejection::ShrinkConflict { candidate_minutes: 20, .. }));
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        assert_eq!(
            resize.finish(),
            Some(ResizeOutcome::Unchanged { appointment_id: "a".to_string() })
        );
    }

    #[test]
    fn test_rejected_shrink_keeps_last_valid_candidate() {
        let target = appt("a", 10, 0, 60);
        let neighbor = appt("b", 10, 0, 45);
        let mut resize = controller();
        resize.begin(&target, 200.0, 15, false).unwrap();

        resize.update(260.0, &[&neighbor]);
        let update = resize.update(120.0, &[&neighbor]).unwrap();
        assert!(matches!(update, ResizeUpdate::Rejected { duration_minutes: 90, .. }));
        assert_eq!(resize.session().unwrap().candidate_duration, 90);
    }

    #[test]
    fn test_shrink_containing_neighbor_is_not_detected() {
        // The conflict rule only checks where the new end lands: shrinking
        // to an interval that still fully contains a neighbor passes.
        let target = appt("a", 10, 0, 90);
        let neighbor = appt("b", 10, 0, 30);
        let mut resize = controller();
        resize.begin(&target, 0.0, 15, false).unwrap();

        let update = resize.update(-40.0, &[&neighbor]).unwrap();
        assert_eq!(update, ResizeUpdate::Accepted { duration_minutes: 70, height: 140.0 });
    }

    #[test]
    fn test_new_end_on_neighbor_boundary_is_allowed() {
        let target = appt("a", 10, 0, 60);
        let neighbor = appt("b", 10, 0, 30);
        let mut resize = controller();
        resize.begin(&target, 0.0, 15, false).unwrap();

        let update = resize.update(-60.0, &[&neighbor]).unwrap();
        assert_eq!(update, ResizeUpdate::Accepted { duration_minutes: 30, height: 60.0 });
    }

    #[test]
    fn test_terminal_appointments_cannot_resize() {
        let mut target = appt("a", 10, 0, 30);
        target.status = AppointmentStatus::Completed;
        let mut resize = controller();
        let err = resize.begin(&target, 0.0, 15, false).unwrap_err();
        assert!(matches!(err, InteractionRejection::TerminalStatus { .. }));
        assert!(!resize.is_active());
    }

    #[test]
    fn test_resize_refused_during_drag() {
        let target = appt("a", 10, 0, 30);
        let mut resize = controller();
        assert_eq!(resize.begin(&target, 0.0, 15, true).unwrap_err(), InteractionRejection::Busy);
    }

    #[test]
    fn test_cancel_discards_candidate() {
        let target = appt("a", 10, 0, 30);
        let mut resize = controller();
        resize.begin(&target, 0.0, 15, false).unwrap();
        resize.update(60.0, &[]);
        assert_eq!(
            resize.cancel(),
            Some(ResizeOutcome::Cancelled { appointment_id: "a".to_string() })
        );
        assert_eq!(resize.cancel(), None);
        assert!(resize.update(10.0, &[]).is_none());
    }
}
