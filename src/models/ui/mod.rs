// UI models module
// View mode and navigation requests for the agenda grid

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which span of days the grid shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    /// Reuses the week grid; only header semantics and navigation step differ
    Month,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Day => write!(f, "day"),
            ViewMode::Week => write!(f, "week"),
            ViewMode::Month => write!(f, "month"),
        }
    }
}

/// Navigation request from the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
    /// Reset the anchor to the supplied current date
    Today(NaiveDate),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mode_serde_and_display() {
        let mode: ViewMode = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(mode, ViewMode::Month);
        assert_eq!(ViewMode::default().to_string(), "week");
    }
}
