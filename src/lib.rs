// Clinic Agenda Library
// Appointment time-grid engine: slot/column/day derivation, placement,
// drag and resize controllers, virtualized rendering.

pub mod grid;
pub mod models;
pub mod services;
pub mod utils;
