//! Rejected interactions.
//!
//! The engine performs no fallible I/O, so its error taxonomy is about
//! pointer gestures that were refused. Every variant is recoverable: the
//! session is dropped and the grid reverts to the last committed state.

use thiserror::Error;

use super::drag::MoveKind;
use crate::models::appointment::AppointmentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionRejection {
    #[error("appointment {appointment_id} is {status} and can no longer be changed")]
    TerminalStatus {
        appointment_id: String,
        status: AppointmentStatus,
    },

    #[error("another drag or resize is already in progress")]
    Busy,

    #[error("appointment {0} is not part of the current agenda")]
    UnknownAppointment(String),

    #[error("drop target is missing a day or time")]
    InvalidDropTarget,

    #[error("your role ({role}) cannot move appointments to another {kind}")]
    PermissionDenied { role: String, kind: MoveKind },

    #[error(
        "cannot shorten appointment {appointment_id} to {candidate_minutes} min: it would end inside appointment {neighbor_id}"
    )]
    ShrinkConflict {
        appointment_id: String,
        candidate_minutes: u32,
        neighbor_id: String,
    },
}

impl InteractionRejection {
    /// Rejections that are shown to the user instead of being silently reverted
    pub fn is_user_facing(&self) -> bool {
        matches!(self, InteractionRejection::PermissionDenied { .. })
    }
}
