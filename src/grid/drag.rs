// Appointment Drag System
//
// Pointer-drag rescheduling of appointment blocks.
// idle -> armed -> dragging -> dropped | cancelled
//
// A pointer-down on an editable block arms the session; the drag only starts
// once the pointer travels past the activation distance. Releasing while
// merely armed is a click.

use chrono::NaiveDate;
use std::fmt;

use super::error::InteractionRejection;
use super::Point;
use crate::models::appointment::Appointment;
use crate::models::column::{GroupBy, UNASSIGNED_BOX_ID};
use crate::models::settings::FRONT_DESK_ROLE;

/// Coarse role used to gate cross-column moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    FrontDesk,
    Other(String),
}

impl Role {
    pub fn parse(role: &str) -> Self {
        let trimmed = role.trim();
        if trimmed.eq_ignore_ascii_case(FRONT_DESK_ROLE) {
            Role::FrontDesk
        } else {
            Role::Other(trimmed.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Role::FrontDesk => FRONT_DESK_ROLE,
            Role::Other(name) => name,
        }
    }
}

/// Cell metadata under the pointer when the drag ends
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropTarget {
    pub day: Option<NaiveDate>,
    /// `HH:MM` slot label
    pub time: Option<String>,
    pub column_id: Option<String>,
}

impl DropTarget {
    pub fn cell(day: NaiveDate, time: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            day: Some(day),
            time: Some(time.into()),
            column_id: Some(column_id.into()),
        }
    }
}

/// Semantic of a drop relative to the origin column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    SameColumn,
    CrossProfessional,
    CrossBox,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::SameColumn => write!(f, "time"),
            MoveKind::CrossProfessional => write!(f, "professional"),
            MoveKind::CrossBox => write!(f, "box"),
        }
    }
}

pub fn classify_move(group_by: GroupBy, origin_column: &str, target_column: &str) -> MoveKind {
    if origin_column == target_column {
        return MoveKind::SameColumn;
    }
    match group_by {
        GroupBy::Professional => MoveKind::CrossProfessional,
        GroupBy::Box => MoveKind::CrossBox,
    }
}

/// Front desk may only move appointments within their column. Every other
/// role is allowed.
pub fn check_move_permission(role: &Role, kind: MoveKind) -> Result<(), InteractionRejection> {
    match (role, kind) {
        (Role::FrontDesk, MoveKind::CrossProfessional | MoveKind::CrossBox) => {
            Err(InteractionRejection::PermissionDenied {
                role: role.name().to_string(),
                kind,
            })
        }
        _ => Ok(()),
    }
}

/// Reschedule request emitted on an accepted drop.
/// Only the id matching the grid's grouping is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleCommand {
    pub appointment_id: String,
    pub new_day: NaiveDate,
    pub new_time: String,
    pub new_professional_id: Option<String>,
    pub new_box_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Armed,
    Dragging,
}

/// Context for an active drag operation
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub appointment_id: String,
    pub group_by: GroupBy,
    pub origin_day: NaiveDate,
    pub origin_time: String,
    pub origin_column: String,
    pub press: Point,
    pub pointer: Point,
    /// Cell currently under the pointer
    pub candidate: Option<DropTarget>,
}

/// How a drag gesture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released before the activation distance: treat as activation
    Click { appointment_id: String },
    Dropped(RescheduleCommand),
    /// Dropped back onto its own cell
    Unchanged { appointment_id: String },
    Cancelled {
        appointment_id: String,
        rejection: Option<InteractionRejection>,
    },
}

#[derive(Debug)]
pub struct DragController {
    activation_distance: f32,
    role: Role,
    phase: DragPhase,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(activation_distance: f32, role: Role) -> Self {
        Self {
            activation_distance,
            role,
            phase: DragPhase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the appointment being dragged, once past the activation distance
    pub fn dragging_id(&self) -> Option<&str> {
        match self.phase {
            DragPhase::Dragging => self.session.as_ref().map(|s| s.appointment_id.as_str()),
            _ => None,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn set_activation_distance(&mut self, distance: f32) {
        self.activation_distance = distance;
    }

    /// Arm a drag on pointer-down over a block body.
    /// Completed and cancelled appointments never arm.
    pub fn pointer_down(
        &mut self,
        appointment: &Appointment,
        group_by: GroupBy,
        pointer: Point,
        resize_active: bool,
    ) -> Result<(), InteractionRejection> {
        if resize_active || self.session.is_some() {
            return Err(InteractionRejection::Busy);
        }

        if appointment.is_terminal() {
            return Err(InteractionRejection::TerminalStatus {
                appointment_id: appointment.id.clone(),
                status: appointment.status,
            });
        }

        self.session = Some(DragSession {
            appointment_id: appointment.id.clone(),
            group_by,
            origin_day: appointment.start_date(),
            origin_time: appointment.start.format("%H:%M").to_string(),
            origin_column: appointment.column_id(group_by).to_string(),
            press: pointer,
            pointer,
            candidate: None,
        });
        self.phase = DragPhase::Armed;
        Ok(())
    }

    /// Track pointer movement; promotes an armed session to dragging once
    /// the pointer has moved past the activation distance.
    pub fn pointer_move(&mut self, pointer: Point, hover: Option<DropTarget>) -> DragPhase {
        let Some(session) = self.session.as_mut() else {
            return self.phase;
        };

        session.pointer = pointer;
        if self.phase == DragPhase::Armed && session.press.distance(pointer) > self.activation_distance {
            log::debug!("Drag activated for appointment {}", session.appointment_id);
            self.phase = DragPhase::Dragging;
        }

        if self.phase == DragPhase::Dragging {
            session.candidate = hover;
        }
        self.phase
    }

    /// Pointer released over `target` (or over nothing)
    pub fn pointer_up(&mut self, target: Option<DropTarget>) -> Option<DragOutcome> {
        let session = self.session.take()?;
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);

        if phase == DragPhase::Armed {
            return Some(DragOutcome::Click {
                appointment_id: session.appointment_id,
            });
        }

        Some(self.resolve_drop(session, target))
    }

    /// Abandon any session without emitting a command
    pub fn cancel(&mut self) -> Option<DragOutcome> {
        let session = self.session.take()?;
        self.phase = DragPhase::Idle;
        log::debug!("Drag cancelled for appointment {}", session.appointment_id);
        Some(DragOutcome::Cancelled {
            appointment_id: session.appointment_id,
            rejection: None,
        })
    }

    fn resolve_drop(&self, session: DragSession, target: Option<DropTarget>) -> DragOutcome {
        let cancelled = |rejection: InteractionRejection| DragOutcome::Cancelled {
            appointment_id: session.appointment_id.clone(),
            rejection: Some(rejection),
        };

        let Some(target) = target else {
            return cancelled(InteractionRejection::InvalidDropTarget);
        };
        let (Some(new_day), Some(new_time)) = (target.day, target.time.filter(|t| !t.trim().is_empty())) else {
            return cancelled(InteractionRejection::InvalidDropTarget);
        };
        let new_column = target
            .column_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| session.origin_column.clone());

        let kind = classify_move(session.group_by, &session.origin_column, &new_column);
        if let Err(rejection) = check_move_permission(&self.role, kind) {
            log::warn!(
                "Move of appointment {} rejected for role {}: {}",
                session.appointment_id,
                self.role.name(),
                rejection
            );
            return cancelled(rejection);
        }

        if kind == MoveKind::SameColumn && new_day == session.origin_day && new_time == session.origin_time {
            return DragOutcome::Unchanged {
                appointment_id: session.appointment_id,
            };
        }

        let (new_professional_id, new_box_id) = match session.group_by {
            GroupBy::Professional => (Some(new_column), None),
            // the unassigned column is synthetic: it maps back to "no box"
            GroupBy::Box if new_column == UNASSIGNED_BOX_ID => (None, None),
            GroupBy::Box => (None, Some(new_column)),
        };

        log::info!(
            "Reschedule of {} to {} {} accepted",
            session.appointment_id,
            new_day,
            new_time
        );

        DragOutcome::Dropped(RescheduleCommand {
            appointment_id: session.appointment_id,
            new_day,
            new_time,
            new_professional_id,
            new_box_id,
        })
    }
}
