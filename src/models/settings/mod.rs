// Settings module
// Configuration surface of the agenda grid

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::column::GroupBy;
use crate::models::ui::ViewMode;

/// Slot durations the grid supports, in minutes
pub const ALLOWED_SLOT_DURATIONS: [u32; 3] = [10, 15, 30];

pub const DEFAULT_SLOT_DURATION: u32 = 30;
pub const DEFAULT_ROW_HEIGHT: f32 = 60.0;
pub const DEFAULT_MIN_DURATION_MINUTES: u32 = 15;
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 8.0;
pub const DEFAULT_OVERSCAN_ROWS: usize = 3;

/// Role whose cross-column moves are refused
pub const FRONT_DESK_ROLE: &str = "front-desk";

/// Bounds of the rendered day, in whole hours (`start` inclusive, `end` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleHours {
    pub start: u32,
    pub end: u32,
}

impl VisibleHours {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end && self.end <= 24
    }
}

impl Default for VisibleHours {
    fn default() -> Self {
        Self { start: 8, end: 20 }
    }
}

/// Engine inputs. None of these are internal state: the grid re-derives
/// its skeleton whenever they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub group_by: GroupBy,
    pub time_slot_duration: u32,
    pub visible_hours: VisibleHours,
    pub view_mode: ViewMode,
    /// Optional centered width (1, 3 or 5 days) for week mode
    pub week_days: Option<u8>,
    pub role: String,
    pub highlighted_appointment_id: Option<String>,
    pub row_height: f32,
    pub activation_distance: f32,
    pub overscan_rows: usize,
    pub default_min_duration: u32,
    pub virtualize: bool,
    /// IANA timezone of the clinic, used to derive "now"
    pub timezone: Option<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Professional,
            time_slot_duration: DEFAULT_SLOT_DURATION,
            visible_hours: VisibleHours::default(),
            view_mode: ViewMode::Week,
            week_days: None,
            role: "admin".to_string(),
            highlighted_appointment_id: None,
            row_height: DEFAULT_ROW_HEIGHT,
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            overscan_rows: DEFAULT_OVERSCAN_ROWS,
            default_min_duration: DEFAULT_MIN_DURATION_MINUTES,
            virtualize: false,
            timezone: None,
        }
    }
}

impl GridSettings {
    /// Validate settings before they are saved.
    ///
    /// The engine itself tolerates invalid values (an invalid slot duration
    /// or hour range renders an empty grid), so this is only enforced at
    /// the persistence boundary.
    pub fn validate(&self) -> Result<(), String> {
        if !ALLOWED_SLOT_DURATIONS.contains(&self.time_slot_duration) {
            return Err(format!(
                "Slot duration must be one of 10, 15 or 30 minutes (got {})",
                self.time_slot_duration
            ));
        }

        if !self.visible_hours.is_valid() {
            return Err(format!(
                "Visible hours must satisfy start < end <= 24 (got {}..{})",
                self.visible_hours.start, self.visible_hours.end
            ));
        }

        if self.row_height.is_nan() || self.row_height <= 0.0 {
            return Err("Row height must be greater than 0".to_string());
        }

        if self.activation_distance < 0.0 {
            return Err("Activation distance cannot be negative".to_string());
        }

        if self.default_min_duration == 0 {
            return Err("Minimum duration must be greater than 0 minutes".to_string());
        }

        self.resolve_timezone()?;

        Ok(())
    }

    /// Parse the configured timezone, if any
    pub fn resolve_timezone(&self) -> Result<Option<Tz>, String> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|err| format!("Unknown timezone '{}': {}", name, err)),
        }
    }
}
