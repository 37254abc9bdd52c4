//! Windowed row rendering for large agendas.
//!
//! Only rows intersecting the scroll viewport (plus an overscan) are
//! materialized. Each row re-derives its own cell occupancy with the
//! overlap test for every (day, column) pair; there is no grid-wide index
//! on this path, so per-scroll work stays bounded by the visible rows.

use std::ops::Range;
use std::time::Duration;

use chrono::NaiveDate;

use super::placement::{appointments_overlapping, CellEntry};
use super::time_slots::TimeSlot;
use crate::models::appointment::Appointment;
use crate::models::column::{Column, GroupBy};

/// Rows to materialize and the spacer heights around them
#[derive(Debug, Clone, PartialEq)]
pub struct RowWindow {
    pub rows: Range<usize>,
    pub spacer_above: f32,
    pub spacer_below: f32,
}

/// Occupancy of one (day, column) cell within a row
#[derive(Debug, Clone, PartialEq)]
pub struct RowCell {
    pub day: NaiveDate,
    pub column: usize,
    pub entries: Vec<CellEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VirtualRow {
    pub slot: TimeSlot,
    pub cells: Vec<RowCell>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualizedRowRenderer {
    row_height: f32,
    row_count: usize,
    overscan: usize,
}

impl VirtualizedRowRenderer {
    pub fn new(row_height: f32, row_count: usize, overscan: usize) -> Self {
        Self {
            row_height,
            row_count,
            overscan,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn total_height(&self) -> f32 {
        self.row_height * self.row_count as f32
    }

    /// Rows whose vertical span intersects `[scroll_top, scroll_top + viewport_height)`,
    /// widened by the overscan and clamped to the row count
    pub fn visible_range(&self, scroll_top: f32, viewport_height: f32) -> Range<usize> {
        if self.row_count == 0 || self.row_height.is_nan() || self.row_height <= 0.0 {
            return 0..0;
        }

        let top = scroll_top.max(0.0);
        let bottom = top + viewport_height.max(0.0);

        let first = ((top / self.row_height).floor() as usize).min(self.row_count);
        let last = ((bottom / self.row_height).ceil() as usize).clamp(first, self.row_count);

        let start = first.saturating_sub(self.overscan);
        let end = (last + self.overscan).min(self.row_count);
        start..end
    }

    pub fn window(&self, scroll_top: f32, viewport_height: f32) -> RowWindow {
        let rows = self.visible_range(scroll_top, viewport_height);
        let spacer_above = rows.start as f32 * self.row_height;
        let spacer_below = (self.row_count - rows.end) as f32 * self.row_height;
        RowWindow {
            rows,
            spacer_above,
            spacer_below,
        }
    }

    /// Materialize the rows in `rows`, deriving occupancy row by row
    pub fn render_rows(
        &self,
        rows: Range<usize>,
        appointments: &[Appointment],
        days: &[NaiveDate],
        columns: &[Column],
        slots: &[TimeSlot],
        slot_minutes: u32,
        group_by: GroupBy,
    ) -> Vec<VirtualRow> {
        let end = rows.end.min(slots.len());
        let start = rows.start.min(end);

        slots[start..end]
            .iter()
            .map(|slot| VirtualRow {
                slot: slot.clone(),
                cells: days
                    .iter()
                    .flat_map(|&day| {
                        columns.iter().enumerate().map(move |(column, col)| RowCell {
                            day,
                            column,
                            entries: appointments_overlapping(
                                appointments,
                                day,
                                &col.id,
                                slot,
                                slot_minutes,
                                group_by,
                            ),
                        })
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Observability sample emitted about once per second
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSample {
    pub fps: u32,
    pub render_duration_ms: f64,
    pub cell_count: usize,
}

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Counts animation frames and reports an FPS estimate once per second.
///
/// Frame deltas are fed by the host loop; the monitor never reads a clock.
#[derive(Debug, Default)]
pub struct FrameRateMonitor {
    running: bool,
    frames: u32,
    elapsed: Duration,
    last_render: Duration,
    cell_count: usize,
}

impl FrameRateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("Frame-rate sampling started");
        }
        self.running = true;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
    }

    /// Tear down sampling; pending frames are discarded
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame-rate sampling stopped");
        }
        self.running = false;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn record_render(&mut self, duration: Duration, cell_count: usize) {
        self.last_render = duration;
        self.cell_count = cell_count;
    }

    /// Count one frame that took `delta` since the previous one
    pub fn record_frame(&mut self, delta: Duration) -> Option<PerformanceSample> {
        if !self.running {
            return None;
        }

        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed < SAMPLE_INTERVAL {
            return None;
        }

        let fps = (f64::from(self.frames) / self.elapsed.as_secs_f64()).round() as u32;
        self.frames = 0;
        self.elapsed = Duration::ZERO;

        Some(PerformanceSample {
            fps,
            render_duration_ms: self.last_render.as_secs_f64() * 1000.0,
            cell_count: self.cell_count,
        })
    }
}
