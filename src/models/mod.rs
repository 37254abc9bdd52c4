// Module exports for models

pub mod appointment;
pub mod column;
pub mod settings;
pub mod ui;
