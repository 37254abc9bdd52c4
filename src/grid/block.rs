//! Appointment block layout.
//!
//! A block is the sized rectangle drawn for one appointment inside a cell.
//! Its height follows the appointment's duration, or the live candidate
//! duration while that appointment is being resized.

use chrono::NaiveDateTime;

use super::placement::{block_height, block_top_offset};
use super::resize::ResizeSession;
use crate::models::appointment::{Appointment, AppointmentStatus};

/// Hit area of the bottom resize handle
pub const RESIZE_HANDLE_SIZE: f32 = 8.0;

/// Which part of a block the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockZone {
    /// Drag to reschedule, click to open
    Body,
    /// Drag to change the duration
    BottomEdge,
}

impl BlockZone {
    /// Classify a pointer offset measured from the block's top edge.
    /// Small blocks split the handle zone in half so the body stays clickable.
    pub fn hit_test(block_height: f32, offset_y: f32) -> BlockZone {
        let zone = if block_height < RESIZE_HANDLE_SIZE * 2.0 {
            block_height / 2.0
        } else {
            RESIZE_HANDLE_SIZE
        };

        if offset_y >= block_height - zone {
            BlockZone::BottomEdge
        } else {
            BlockZone::Body
        }
    }
}

/// Per-render inputs shared by every block
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub slot_minutes: u32,
    pub row_height: f32,
    pub highlighted_id: Option<&'a str>,
    pub dragging_id: Option<&'a str>,
    pub resize: Option<&'a ResizeSession>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub appointment_id: String,
    /// Index into the source appointment collection
    pub position: usize,
    pub status: AppointmentStatus,
    pub title: String,
    pub time_range: String,
    pub duration_minutes: u32,
    pub height: f32,
    /// Offset of the appointment start from the top of the cell
    pub top_offset: f32,
    pub starts_here: bool,
    pub highlighted: bool,
    pub draggable: bool,
    pub resizable: bool,
    pub dragging: bool,
    pub resizing: bool,
}

impl BlockLayout {
    pub fn for_appointment(
        appointment: &Appointment,
        position: usize,
        starts_here: bool,
        slot_start: NaiveDateTime,
        ctx: &BlockContext<'_>,
    ) -> Self {
        let live_resize = ctx
            .resize
            .filter(|session| session.appointment_id == appointment.id);
        let duration_minutes = live_resize
            .map(|session| session.candidate_duration)
            .unwrap_or(appointment.duration_minutes);
        let editable = !appointment.is_terminal();

        Self {
            appointment_id: appointment.id.clone(),
            position,
            status: appointment.status,
            title: appointment.patient_label().to_string(),
            time_range: format!(
                "{}-{}",
                appointment.start.format("%H:%M"),
                appointment.end.format("%H:%M")
            ),
            duration_minutes,
            height: block_height(duration_minutes, ctx.slot_minutes, ctx.row_height),
            top_offset: block_top_offset(appointment.start, slot_start, ctx.slot_minutes, ctx.row_height),
            starts_here,
            highlighted: ctx.highlighted_id == Some(appointment.id.as_str()),
            draggable: editable,
            resizable: editable,
            dragging: ctx.dragging_id == Some(appointment.id.as_str()),
            resizing: live_resize.is_some(),
        }
    }
}
