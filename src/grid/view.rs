//! Agenda grid composition root.
//!
//! [`GridView`] owns the settings, the supplied agenda data and the
//! anchor-date navigation state. It derives the grid skeleton through
//! memoized resolvers, renders either the full grid or a virtualized row
//! window, and routes pointer events to the mutually exclusive drag and
//! resize controllers.
//!
//! Any in-progress interaction is abandoned when the anchor, view mode,
//! grouping or data change, or when the view unmounts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};

use super::block::{BlockContext, BlockLayout, BlockZone};
use super::callbacks::GridCallbacks;
use super::columns::resolve_columns;
use super::days::{navigate, resolve_days};
use super::drag::{DragController, DragOutcome, DragPhase, DropTarget, Role};
use super::error::InteractionRejection;
use super::memo::Memo;
use super::placement::{
    appointments_in_cell, appointments_overlapping, slot_timing, CellEntry, CellIndex, CellKey, SlotTiming,
};
use super::resize::{ResizeController, ResizeGeometry, ResizeOutcome, ResizeUpdate};
use super::time_slots::{floor_to_slot, generate_time_slots, slot_by_label, TimeSlot};
use super::virtualized::{FrameRateMonitor, VirtualizedRowRenderer};
use super::Point;
use crate::models::appointment::Appointment;
use crate::models::column::{Column, GroupBy, Professional};
use crate::models::settings::{GridSettings, VisibleHours};
use crate::models::ui::{Navigation, ViewMode};
use crate::utils::date::minutes_of_day;

/// Data supplied by the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgendaData {
    pub appointments: Vec<Appointment>,
    pub professionals: Option<Vec<Professional>>,
    /// Treatment id -> minimum duration in minutes, used as the resize floor
    pub treatment_min_durations: HashMap<String, u32>,
}

impl AgendaData {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            ..Default::default()
        }
    }

    pub fn with_roster(mut self, professionals: Vec<Professional>) -> Self {
        self.professionals = Some(professionals);
        self
    }

    pub fn with_treatment_minimum(mut self, treatment_id: impl Into<String>, minutes: u32) -> Self {
        self.treatment_min_durations.insert(treatment_id.into(), minutes);
        self
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|appt| appt.id == id)
    }

    /// Resize floor for an appointment: its treatment's minimum, else `default`
    pub fn min_duration_for(&self, appointment: &Appointment, default: u32) -> u32 {
        appointment
            .treatment_id
            .as_ref()
            .and_then(|treatment| self.treatment_min_durations.get(treatment))
            .copied()
            .filter(|&minutes| minutes > 0)
            .unwrap_or(default)
    }
}

/// Scroll state for the virtualized renderer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(scroll_top: f32, height: f32) -> Self {
        Self { scroll_top, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCellView {
    pub day: NaiveDate,
    pub column: usize,
    pub column_id: String,
    pub time_label: String,
    pub timing: SlotTiming,
    pub blocks: Vec<BlockLayout>,
}

impl GridCellView {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Metadata the drag controller resolves a drop against
    pub fn drop_target(&self) -> DropTarget {
        DropTarget::cell(self.day, self.time_label.clone(), self.column_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub slot: TimeSlot,
    /// Cells ordered day-major, then column
    pub cells: Vec<GridCellView>,
}

/// Output of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub view_mode: ViewMode,
    pub group_by: GroupBy,
    pub days: Vec<NaiveDate>,
    pub columns: Vec<Column>,
    pub rows: Vec<GridRow>,
    /// Index of the first rendered row within the full slot list
    pub first_row: usize,
    pub total_rows: usize,
    pub spacer_above: f32,
    pub spacer_below: f32,
    pub total_height: f32,
    pub virtualized: bool,
}

impl GridFrame {
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }

    pub fn block_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| cell.blocks.len())
            .sum()
    }

    pub fn cell(&self, day: NaiveDate, column_id: &str, time_label: &str) -> Option<&GridCellView> {
        self.rows
            .iter()
            .filter(|row| row.slot.label == time_label)
            .flat_map(|row| row.cells.iter())
            .find(|cell| cell.day == day && cell.column_id == column_id)
    }
}

/// What a pointer move did
#[derive(Debug, Clone, PartialEq)]
pub enum PointerFeedback {
    Idle,
    Drag(DragPhase),
    Resize(ResizeUpdate),
}

/// How a pointer release was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    Drag(DragOutcome),
    Resize(ResizeOutcome),
    /// Click on a block that cannot be dragged
    Activated { appointment_id: String },
}

pub struct GridView {
    settings: GridSettings,
    data: AgendaData,
    data_revision: u64,
    anchor: NaiveDate,
    slots: Memo<(VisibleHours, u32), Vec<TimeSlot>>,
    columns: Memo<(GroupBy, u64), Vec<Column>>,
    days: Memo<(NaiveDate, ViewMode, Option<u8>), Vec<NaiveDate>>,
    drag: DragController,
    resize: ResizeController,
    pending_click: Option<String>,
    monitor: FrameRateMonitor,
    notice: Option<InteractionRejection>,
}

impl GridView {
    pub fn new(settings: GridSettings, data: AgendaData, anchor: NaiveDate) -> Self {
        let drag = DragController::new(settings.activation_distance, Role::parse(&settings.role));
        let resize = ResizeController::new(ResizeGeometry::new(settings.row_height, settings.time_slot_duration));

        Self {
            settings,
            data,
            data_revision: 0,
            anchor,
            slots: Memo::new("time slots"),
            columns: Memo::new("columns"),
            days: Memo::new("visible days"),
            drag,
            resize,
            pending_click: None,
            monitor: FrameRateMonitor::new(),
            notice: None,
        }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn data(&self) -> &AgendaData {
        &self.data
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn view_mode(&self) -> ViewMode {
        self.settings.view_mode
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    pub fn is_interacting(&self) -> bool {
        self.drag.is_active() || self.resize.is_active() || self.pending_click.is_some()
    }

    pub fn is_sampling(&self) -> bool {
        self.monitor.is_running()
    }

    /// Last user-facing rejection, until taken
    pub fn notice(&self) -> Option<&InteractionRejection> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<InteractionRejection> {
        self.notice.take()
    }

    // ---- inputs -------------------------------------------------------

    pub fn navigate(&mut self, navigation: Navigation) {
        let anchor = navigate(self.anchor, self.settings.view_mode, navigation);
        self.set_anchor(anchor);
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        if anchor != self.anchor {
            self.cancel_interaction();
            self.anchor = anchor;
        }
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if view_mode != self.settings.view_mode {
            self.cancel_interaction();
            self.settings.view_mode = view_mode;
        }
    }

    pub fn set_group_by(&mut self, group_by: GroupBy) {
        if group_by != self.settings.group_by {
            self.cancel_interaction();
            self.settings.group_by = group_by;
        }
    }

    /// Replace the settings. Changes to the grid's shape abandon any
    /// in-progress interaction; cosmetic changes do not.
    pub fn set_settings(&mut self, settings: GridSettings) {
        let reshaped = settings.group_by != self.settings.group_by
            || settings.view_mode != self.settings.view_mode
            || settings.week_days != self.settings.week_days
            || settings.time_slot_duration != self.settings.time_slot_duration
            || settings.visible_hours != self.settings.visible_hours
            || settings.row_height != self.settings.row_height
            || settings.role != self.settings.role;
        if reshaped {
            self.cancel_interaction();
        }

        if !settings.virtualize {
            self.monitor.stop();
        }

        self.drag.set_role(Role::parse(&settings.role));
        self.drag.set_activation_distance(settings.activation_distance);
        self.resize
            .set_geometry(ResizeGeometry::new(settings.row_height, settings.time_slot_duration));
        self.settings = settings;
    }

    /// Re-supply the agenda after the controller applied a change
    pub fn set_data(&mut self, data: AgendaData) {
        self.cancel_interaction();
        self.data = data;
        self.data_revision += 1;
    }

    /// Abandon any drag or resize, reverting to the committed state
    pub fn cancel_interaction(&mut self) {
        self.drag.cancel();
        self.resize.cancel();
        self.pending_click = None;
    }

    /// Host view went away: drop sessions and stop frame sampling
    pub fn unmount(&mut self) {
        self.cancel_interaction();
        self.monitor.stop();
        log::debug!("Grid view unmounted");
    }

    // ---- derivation ---------------------------------------------------

    fn refresh_skeleton(&mut self) {
        let hours = self.settings.visible_hours;
        let slot_minutes = self.settings.time_slot_duration;
        self.slots
            .get_or_compute((hours, slot_minutes), |&(hours, minutes)| generate_time_slots(hours, minutes));

        let data = &self.data;
        self.columns.get_or_compute((self.settings.group_by, self.data_revision), |&(group_by, _)| {
            resolve_columns(group_by, &data.appointments, data.professionals.as_deref())
        });

        self.days.get_or_compute(
            (self.anchor, self.settings.view_mode, self.settings.week_days),
            |&(anchor, mode, width)| resolve_days(anchor, mode, width),
        );
    }

    fn slot_list(&self) -> &[TimeSlot] {
        self.slots.value().map(Vec::as_slice).unwrap_or(&[])
    }

    fn column_list(&self) -> &[Column] {
        self.columns.value().map(Vec::as_slice).unwrap_or(&[])
    }

    fn day_list(&self) -> &[NaiveDate] {
        self.days.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn time_slots(&mut self) -> &[TimeSlot] {
        self.refresh_skeleton();
        self.slot_list()
    }

    pub fn columns(&mut self) -> &[Column] {
        self.refresh_skeleton();
        self.column_list()
    }

    pub fn visible_days(&mut self) -> &[NaiveDate] {
        self.refresh_skeleton();
        self.day_list()
    }

    /// `(hits, misses)` for the slot, column and day memos
    pub fn memo_stats(&self) -> [(u64, u64); 3] {
        [self.slots.stats(), self.columns.stats(), self.days.stats()]
    }

    fn block_context(&self) -> BlockContext<'_> {
        BlockContext {
            slot_minutes: self.settings.time_slot_duration,
            row_height: self.settings.row_height,
            highlighted_id: self.settings.highlighted_appointment_id.as_deref(),
            dragging_id: self.drag.dragging_id(),
            resize: self.resize.session(),
        }
    }

    // ---- rendering ----------------------------------------------------

    /// Render with the strategy selected by `settings.virtualize`
    pub fn render(&mut self, viewport: Viewport, now: NaiveDateTime) -> GridFrame {
        if self.settings.virtualize {
            self.render_window(viewport, now)
        } else {
            self.render_full(now)
        }
    }

    /// Full grid with exact-start placement
    pub fn render_full(&mut self, now: NaiveDateTime) -> GridFrame {
        self.refresh_skeleton();

        let slots = self.slot_list();
        let columns = self.column_list();
        let days = self.day_list();
        let group_by = self.settings.group_by;
        let slot_minutes = self.settings.time_slot_duration;
        let ctx = self.block_context();

        let index = CellIndex::build_exact(&self.data.appointments, days, columns, slots, group_by);

        let rows = slots
            .iter()
            .map(|slot| GridRow {
                slot: slot.clone(),
                cells: days
                    .iter()
                    .flat_map(|&day| {
                        columns.iter().enumerate().map(move |(column, col)| (day, column, col))
                    })
                    .map(|(day, column, col)| {
                        let entries: Vec<CellEntry> = index
                            .get(CellKey {
                                day,
                                column,
                                slot: slot.index,
                            })
                            .iter()
                            .map(|&position| CellEntry {
                                position,
                                starts_here: true,
                            })
                            .collect();
                        self.cell_view(day, column, col, slot, &entries, slot_minutes, now, &ctx)
                    })
                    .collect(),
            })
            .collect();

        GridFrame {
            view_mode: self.settings.view_mode,
            group_by,
            days: days.to_vec(),
            columns: columns.to_vec(),
            rows,
            first_row: 0,
            total_rows: slots.len(),
            spacer_above: 0.0,
            spacer_below: 0.0,
            total_height: slots.len() as f32 * self.settings.row_height,
            virtualized: false,
        }
    }

    /// Only the rows intersecting `viewport`, placed with the overlap test.
    /// Starts frame-rate sampling if it is not running yet.
    pub fn render_window(&mut self, viewport: Viewport, now: NaiveDateTime) -> GridFrame {
        let started = Instant::now();
        self.refresh_skeleton();
        if !self.monitor.is_running() {
            self.monitor.start();
        }

        let slots = self.slot_list();
        let columns = self.column_list();
        let days = self.day_list();
        let group_by = self.settings.group_by;
        let slot_minutes = self.settings.time_slot_duration;
        let ctx = self.block_context();

        let renderer = VirtualizedRowRenderer::new(self.settings.row_height, slots.len(), self.settings.overscan_rows);
        let window = renderer.window(viewport.scroll_top, viewport.height);
        let rows: Vec<GridRow> = renderer
            .render_rows(
                window.rows.clone(),
                &self.data.appointments,
                days,
                columns,
                slots,
                slot_minutes,
                group_by,
            )
            .into_iter()
            .map(|row| GridRow {
                cells: row
                    .cells
                    .iter()
                    .filter_map(|cell| {
                        columns.get(cell.column).map(|col| {
                            self.cell_view(cell.day, cell.column, col, &row.slot, &cell.entries, slot_minutes, now, &ctx)
                        })
                    })
                    .collect(),
                slot: row.slot,
            })
            .collect();

        let frame = GridFrame {
            view_mode: self.settings.view_mode,
            group_by,
            days: days.to_vec(),
            columns: columns.to_vec(),
            rows,
            first_row: window.rows.start,
            total_rows: slots.len(),
            spacer_above: window.spacer_above,
            spacer_below: window.spacer_below,
            total_height: renderer.total_height(),
            virtualized: true,
        };

        self.monitor.record_render(started.elapsed(), frame.cell_count());
        frame
    }

    #[allow(clippy::too_many_arguments)]
    fn cell_view(
        &self,
        day: NaiveDate,
        column: usize,
        col: &Column,
        slot: &TimeSlot,
        entries: &[CellEntry],
        slot_minutes: u32,
        now: NaiveDateTime,
        ctx: &BlockContext<'_>,
    ) -> GridCellView {
        let slot_start = slot.start_on(day);
        let blocks = entries
            .iter()
            .filter_map(|entry| {
                self.data.appointments.get(entry.position).map(|appt| {
                    BlockLayout::for_appointment(appt, entry.position, entry.starts_here, slot_start, ctx)
                })
            })
            .collect();

        GridCellView {
            day,
            column,
            column_id: col.id.clone(),
            time_label: slot.label.clone(),
            timing: slot_timing(day, slot, slot_minutes, now),
            blocks,
        }
    }

    /// Feed one animation-frame delta; emits a sample about once per second
    pub fn frame_tick(&mut self, delta: Duration, callbacks: &mut dyn GridCallbacks) {
        if let Some(sample) = self.monitor.record_frame(delta) {
            log::debug!(
                "Grid sample: {} fps, {:.2} ms render, {} cells",
                sample.fps,
                sample.render_duration_ms,
                sample.cell_count
            );
            callbacks.on_performance_sample(&sample);
        }
    }

    // ---- interaction --------------------------------------------------

    /// Pointer pressed on an appointment block
    pub fn pointer_down(
        &mut self,
        appointment_id: &str,
        zone: BlockZone,
        pointer: Point,
        callbacks: &mut dyn GridCallbacks,
    ) -> Result<(), InteractionRejection> {
        let appointment = self
            .data
            .appointment(appointment_id)
            .ok_or_else(|| InteractionRejection::UnknownAppointment(appointment_id.to_string()))?;

        if self.is_interacting() {
            return Err(InteractionRejection::Busy);
        }

        match zone {
            BlockZone::Body => {
                let armed = self
                    .drag
                    .pointer_down(appointment, self.settings.group_by, pointer, self.resize.is_active());
                if let Err(InteractionRejection::TerminalStatus { .. }) = &armed {
                    // still clickable
                    self.pending_click = Some(appointment.id.clone());
                }
                armed
            }
            BlockZone::BottomEdge => {
                let min_duration = self
                    .data
                    .min_duration_for(appointment, self.settings.default_min_duration);
                self.resize
                    .begin(appointment, pointer.y, min_duration, self.drag.is_active())?;
                callbacks.on_resize_start(appointment);
                Ok(())
            }
        }
    }

    pub fn pointer_move(&mut self, pointer: Point, hover: Option<DropTarget>) -> PointerFeedback {
        if self.resize.is_active() {
            let neighbors = self
                .resize
                .session()
                .and_then(|session| self.data.appointment(&session.appointment_id))
                .map(|appt| resize_neighbors(&self.data, &self.settings, appt))
                .unwrap_or_default();
            return match self.resize.update(pointer.y, &neighbors) {
                Some(update) => PointerFeedback::Resize(update),
                None => PointerFeedback::Idle,
            };
        }

        if self.drag.is_active() {
            return PointerFeedback::Drag(self.drag.pointer_move(pointer, hover));
        }

        PointerFeedback::Idle
    }

    /// Pointer released, over `target` when it is above a grid cell
    pub fn pointer_up(
        &mut self,
        target: Option<DropTarget>,
        callbacks: &mut dyn GridCallbacks,
    ) -> Option<InteractionOutcome> {
        if let Some(outcome) = self.resize.finish() {
            if let ResizeOutcome::Committed {
                appointment_id,
                duration_minutes,
            } = &outcome
            {
                if let Some(appointment) = self.data.appointment(appointment_id) {
                    callbacks.on_resize_commit(appointment, *duration_minutes);
                }
            }
            return Some(InteractionOutcome::Resize(outcome));
        }

        if let Some(outcome) = self.drag.pointer_up(target) {
            self.dispatch_drag(&outcome, callbacks);
            return Some(InteractionOutcome::Drag(outcome));
        }

        let appointment_id = self.pending_click.take()?;
        if let Some(appointment) = self.data.appointment(&appointment_id) {
            callbacks.on_appointment_activate(appointment);
        }
        Some(InteractionOutcome::Activated { appointment_id })
    }

    fn dispatch_drag(&mut self, outcome: &DragOutcome, callbacks: &mut dyn GridCallbacks) {
        match outcome {
            DragOutcome::Click { appointment_id } => {
                if let Some(appointment) = self.data.appointment(appointment_id) {
                    callbacks.on_appointment_activate(appointment);
                }
            }
            DragOutcome::Dropped(command) => callbacks.on_reschedule_commit(command),
            DragOutcome::Unchanged { .. } => {}
            DragOutcome::Cancelled { rejection, .. } => {
                if let Some(rejection) = rejection.as_ref().filter(|r| r.is_user_facing()) {
                    callbacks.on_interaction_rejected(rejection);
                    self.notice = Some(rejection.clone());
                }
            }
        }
    }

    /// Click on an empty cell. Ignored while an interaction is in progress
    /// or when the label is not one of the current slots.
    pub fn activate_empty_slot(&mut self, day: NaiveDate, time_label: &str, callbacks: &mut dyn GridCallbacks) -> bool {
        if self.is_interacting() {
            return false;
        }

        self.refresh_skeleton();
        if slot_by_label(self.slot_list(), time_label).is_none() {
            log::debug!("Ignoring activation of unknown slot {}", time_label);
            return false;
        }

        callbacks.on_empty_slot_activate(day, time_label);
        true
    }
}

/// Appointments sharing the resized appointment's cell under the active
/// rendering strategy
fn resize_neighbors<'a>(
    data: &'a AgendaData,
    settings: &GridSettings,
    appointment: &Appointment,
) -> Vec<&'a Appointment> {
    let group_by = settings.group_by;
    let slot_minutes = settings.time_slot_duration;
    let start_minutes = floor_to_slot(minutes_of_day(appointment.start.time()), slot_minutes);
    let slot = TimeSlot::new(0, start_minutes);
    let day = appointment.start_date();
    let column_id = appointment.column_id(group_by);

    if settings.virtualize {
        appointments_overlapping(&data.appointments, day, column_id, &slot, slot_minutes, group_by)
            .into_iter()
            .filter_map(|entry| data.appointments.get(entry.position))
            .collect()
    } else {
        appointments_in_cell(&data.appointments, day, column_id, &slot, group_by)
    }
}
