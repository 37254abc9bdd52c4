//! Intent callbacks from the grid to its controller.
//!
//! The grid never mutates appointments. Every accepted interaction is
//! reported through [`GridCallbacks`] and the controller re-supplies the
//! updated collection.

use chrono::NaiveDate;

use super::drag::RescheduleCommand;
use super::error::InteractionRejection;
use super::virtualized::PerformanceSample;
use crate::models::appointment::Appointment;

#[cfg_attr(test, mockall::automock)]
pub trait GridCallbacks {
    fn on_appointment_activate(&mut self, appointment: &Appointment);

    fn on_empty_slot_activate(&mut self, day: NaiveDate, time_label: &str);

    fn on_reschedule_commit(&mut self, command: &RescheduleCommand);

    fn on_resize_start(&mut self, appointment: &Appointment);

    fn on_resize_commit(&mut self, appointment: &Appointment, new_duration_minutes: u32);

    /// Only fired by the virtualized renderer
    fn on_performance_sample(&mut self, _sample: &PerformanceSample) {}

    /// User-facing rejection notice, delivered synchronously
    fn on_interaction_rejected(&mut self, _rejection: &InteractionRejection) {}
}

/// One recorded callback invocation
#[derive(Debug, Clone, PartialEq)]
pub enum GridCommand {
    Activate { appointment_id: String },
    EmptySlot { day: NaiveDate, time_label: String },
    Reschedule(RescheduleCommand),
    ResizeStart { appointment_id: String },
    ResizeCommit { appointment_id: String, duration_minutes: u32 },
    Performance(PerformanceSample),
    Rejected(InteractionRejection),
}

/// Callback sink that records every command in order.
///
/// Used by the binary and handy for hosts that batch commands.
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    commands: Vec<GridCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[GridCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<GridCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Notices that should be shown to the user
    pub fn rejections(&self) -> impl Iterator<Item = &InteractionRejection> {
        self.commands.iter().filter_map(|command| match command {
            GridCommand::Rejected(rejection) => Some(rejection),
            _ => None,
        })
    }
}

impl GridCallbacks for CommandLog {
    fn on_appointment_activate(&mut self, appointment: &Appointment) {
        self.commands.push(GridCommand::Activate {
            appointment_id: appointment.id.clone(),
        });
    }

    fn on_empty_slot_activate(&mut self, day: NaiveDate, time_label: &str) {
        self.commands.push(GridCommand::EmptySlot {
            day,
            time_label: time_label.to_string(),
        });
    }

    fn on_reschedule_commit(&mut self, command: &RescheduleCommand) {
        self.commands.push(GridCommand::Reschedule(command.clone()));
    }

    fn on_resize_start(&mut self, appointment: &Appointment) {
        self.commands.push(GridCommand::ResizeStart {
            appointment_id: appointment.id.clone(),
        });
    }

    fn on_resize_commit(&mut self, appointment: &Appointment, new_duration_minutes: u32) {
        self.commands.push(GridCommand::ResizeCommit {
            appointment_id: appointment.id.clone(),
            duration_minutes: new_duration_minutes,
        });
    }

    fn on_performance_sample(&mut self, sample: &PerformanceSample) {
        self.commands.push(GridCommand::Performance(sample.clone()));
    }

    fn on_interaction_rejected(&mut self, rejection: &InteractionRejection) {
        self.commands.push(GridCommand::Rejected(rejection.clone()));
    }
}
