// Agenda snapshot module
// JSON agenda exports loaded by the command-line tool and the test fixtures

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::view::AgendaData;
use crate::models::appointment::Appointment;
use crate::models::column::Professional;

/// Appointments, roster and treatment minimums as exported by the clinic backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaSnapshot {
    #[serde(alias = "citas")]
    pub appointments: Vec<Appointment>,
    #[serde(alias = "profesionales")]
    pub professionals: Option<Vec<Professional>>,
    /// Treatment id -> minimum duration in minutes
    #[serde(alias = "duraciones_minimas")]
    pub treatment_min_durations: HashMap<String, u32>,
}

impl AgendaSnapshot {
    pub fn validate(&self) -> Result<(), String> {
        for appointment in &self.appointments {
            appointment
                .validate()
                .map_err(|err| format!("appointment {}: {}", appointment.id, err))?;
        }
        Ok(())
    }

    pub fn into_agenda_data(self) -> AgendaData {
        AgendaData {
            appointments: self.appointments,
            professionals: self.professionals,
            treatment_min_durations: self.treatment_min_durations,
        }
    }
}

pub fn parse_snapshot(data: &str) -> Result<AgendaSnapshot> {
    let snapshot: AgendaSnapshot = serde_json::from_str(data).context("failed to deserialize agenda snapshot")?;
    snapshot
        .validate()
        .map_err(|e| anyhow!("Invalid agenda snapshot: {}", e))?;
    Ok(snapshot)
}

pub fn load_snapshot(path: &Path) -> Result<AgendaSnapshot> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read agenda from {}", path.display()))?;
    let snapshot = parse_snapshot(&data).with_context(|| format!("failed to load agenda from {}", path.display()))?;
    log::info!(
        "Loaded {} appointment(s) from {}",
        snapshot.appointments.len(),
        path.display()
    );
    Ok(snapshot)
}
