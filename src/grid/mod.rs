// Agenda grid engine
// Slot/column/day derivation, placement, drag and resize controllers,
// virtualized rows and the composing view.

pub mod block;
pub mod callbacks;
pub mod columns;
pub mod days;
pub mod drag;
pub mod error;
pub mod memo;
pub mod placement;
pub mod resize;
pub mod text;
pub mod time_slots;
pub mod view;
pub mod virtualized;

pub use callbacks::{CommandLog, GridCallbacks, GridCommand};
pub use drag::{DropTarget, RescheduleCommand};
pub use error::InteractionRejection;
pub use view::{AgendaData, GridFrame, GridView, Viewport};

/// Pointer position in grid pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
