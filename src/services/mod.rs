// Service module exports
// File-backed services around the grid engine

pub mod settings;
pub mod snapshot;
