//! Plain-text rendering of a [`GridFrame`], used by the command-line tool.

use std::fmt::Write;

use super::block::BlockLayout;
use super::placement::SlotTiming;
use super::view::{GridCellView, GridFrame};

const EMPTY_CELL: &str = ".";
const TIME_WIDTH: usize = 5;

fn block_text(block: &BlockLayout) -> String {
    let mut text = String::new();
    if block.highlighted {
        text.push('*');
    }
    if !block.starts_here {
        // continues from an earlier slot
        text.push_str("~ ");
    }
    text.push_str(&block.title);
    if block.starts_here {
        let _ = write!(text, " {} [{}]", block.time_range, block.status);
    }
    text
}

fn cell_text(cell: &GridCellView) -> String {
    if cell.is_empty() {
        return EMPTY_CELL.to_string();
    }
    cell.blocks.iter().map(block_text).collect::<Vec<_>>().join(" | ")
}

fn timing_marker(timing: SlotTiming) -> char {
    match timing {
        SlotTiming::Current => '>',
        SlotTiming::Past | SlotTiming::Future => ' ',
    }
}

/// Render a frame as an aligned table: one header line with a
/// `day column` heading per cell, then one line per rendered row.
pub fn render_text(frame: &GridFrame) -> String {
    let headings: Vec<String> = frame
        .days
        .iter()
        .flat_map(|day| {
            frame
                .columns
                .iter()
                .map(move |column| format!("{} {}", day.format("%a %d/%m"), column.label))
        })
        .collect();

    let body: Vec<(char, String, Vec<String>)> = frame
        .rows
        .iter()
        .map(|row| {
            let marker = row
                .cells
                .first()
                .map(|cell| timing_marker(cell.timing))
                .unwrap_or(' ');
            (marker, row.slot.label.clone(), row.cells.iter().map(cell_text).collect())
        })
        .collect();

    let widths: Vec<usize> = headings
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            body.iter()
                .filter_map(|(_, _, cells)| cells.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(heading.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{} view, grouped by {}", frame.view_mode, frame.group_by.column_kind());

    if frame.virtualized {
        let last = frame.first_row + frame.rows.len();
        let _ = writeln!(
            out,
            "rows {}-{} of {} ({:.0}px above, {:.0}px below)",
            frame.first_row, last, frame.total_rows, frame.spacer_above, frame.spacer_below
        );
    }

    if frame.rows.is_empty() {
        out.push_str("(no time slots)\n");
        return out;
    }

    let _ = write!(out, "  {:<width$}", "", width = TIME_WIDTH);
    for (heading, width) in headings.iter().zip(&widths) {
        let _ = write!(out, " | {:<width$}", heading, width = *width);
    }
    out.push('\n');

    for (marker, label, cells) in &body {
        let _ = write!(out, "{} {:<width$}", marker, label, width = TIME_WIDTH);
        for (cell, width) in cells.iter().zip(&widths) {
            let _ = write!(out, " | {:<width$}", cell, width = *width);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::view::{AgendaData, GridView};
    use crate::models::appointment::Appointment;
    use crate::models::settings::{GridSettings, VisibleHours};
    use crate::models::ui::ViewMode;
    use chrono::NaiveDate;

    fn grid(appointments: Vec<Appointment>, hours: VisibleHours) -> GridView {
        let settings = GridSettings {
            visible_hours: hours,
            view_mode: ViewMode::Day,
            highlighted_appointment_id: Some("a-1".to_string()),
            ..GridSettings::default()
        };
        GridView::new(
            settings,
            AgendaData::new(appointments),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        )
    }

    #[test]
    fn test_renders_blocks_and_headers() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let appointment = Appointment::builder()
            .id("a-1")
            .start(day.and_hms_opt(9, 0, 0).unwrap())
            .duration_minutes(30)
            .patient("pat-1", "Ana Gil")
            .professional("p1", "Dr. Vega")
            .build()
            .unwrap();
        let mut view = grid(vec![appointment], VisibleHours::new(9, 10));
        let frame = view.render_full(day.and_hms_opt(9, 10, 0).unwrap());
        let text = render_text(&frame);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "day view, grouped by professional");
        assert!(lines[1].contains("Mon 10/03 Dr. Vega"));
        assert!(lines[2].starts_with("> 09:00"));
        assert!(lines[2].contains("*Ana Gil 09:00-09:30 [scheduled]"));
        assert!(lines[3].contains(" | ."));
    }

    #[test]
    fn test_empty_grid_message() {
        let mut view = grid(vec![], VisibleHours::new(12, 9));
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let text = render_text(&view.render_full(day.and_hms_opt(8, 0, 0).unwrap()));
        assert!(text.ends_with("(no time slots)\n"));
    }
}
