// Appointment module
// Clinic appointment record as supplied by the agenda controller

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::column::{GroupBy, UNASSIGNED_BOX_ID};

/// Lifecycle status of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[default]
    #[serde(alias = "programada", alias = "pendiente")]
    Scheduled,
    #[serde(alias = "confirmada")]
    Confirmed,
    #[serde(alias = "cancelada")]
    Cancelled,
    #[serde(alias = "completada")]
    Completed,
    #[serde(alias = "no_show", alias = "no_asistio")]
    NoShow,
}

impl AppointmentStatus {
    /// Completed and cancelled appointments can no longer be moved or resized
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::NoShow => "no-show",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProfessionalRef {
    pub id: String,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
}

impl ProfessionalRef {
    /// Display label, falling back to the id when no name is known
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

/// Appointment as rendered by the time grid.
///
/// `duration_minutes` is the authoritative editable field: at rest
/// `end == start + duration_minutes`. The engine never mutates these
/// records; it only requests changes through callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(alias = "fecha_hora_inicio")]
    pub start: NaiveDateTime,
    #[serde(alias = "fecha_hora_fin")]
    pub end: NaiveDateTime,
    #[serde(alias = "duracion_minutos")]
    pub duration_minutes: u32,
    #[serde(default, alias = "estado")]
    pub status: AppointmentStatus,
    #[serde(alias = "paciente")]
    pub patient: PatientRef,
    #[serde(alias = "profesional")]
    pub professional: ProfessionalRef,
    #[serde(default, alias = "tratamiento_id")]
    pub treatment_id: Option<String>,
    #[serde(default, alias = "box_asignado")]
    pub box_id: Option<String>,
    #[serde(default, alias = "notas")]
    pub notes: String,
    #[serde(default, alias = "sede_id")]
    pub site_id: Option<String>,
}

impl Appointment {
    /// Create a builder for constructing appointments
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the at-rest invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Appointment id cannot be empty".to_string());
        }

        if self.duration_minutes == 0 {
            return Err("Appointment duration must be greater than 0 minutes".to_string());
        }

        if self.end != self.scheduled_end() {
            return Err(format!(
                "Appointment {} end {} does not match start + {} minutes",
                self.id, self.end, self.duration_minutes
            ));
        }

        if self.professional.id.trim().is_empty() {
            return Err("Appointment professional cannot be empty".to_string());
        }

        Ok(())
    }

    /// End derived from the authoritative duration
    pub fn scheduled_end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Assigned box, ignoring blank values
    pub fn assigned_box(&self) -> Option<&str> {
        self.box_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Column this appointment belongs to under the given grouping.
    /// Appointments without a box map to the synthetic unassigned column.
    pub fn column_id(&self, group_by: GroupBy) -> &str {
        match group_by {
            GroupBy::Professional => self.professional.id.as_str(),
            GroupBy::Box => self.assigned_box().unwrap_or(UNASSIGNED_BOX_ID),
        }
    }

    /// Short label for block rendering
    pub fn patient_label(&self) -> &str {
        self.patient
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.patient.id.as_str())
    }
}

/// Builder for creating appointments with optional fields
pub struct AppointmentBuilder {
    id: Option<String>,
    start: Option<NaiveDateTime>,
    duration_minutes: Option<u32>,
    status: AppointmentStatus,
    patient: Option<PatientRef>,
    professional: Option<ProfessionalRef>,
    treatment_id: Option<String>,
    box_id: Option<String>,
    notes: String,
    site_id: Option<String>,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            start: None,
            duration_minutes: None,
            status: AppointmentStatus::default(),
            patient: None,
            professional: None,
            treatment_id: None,
            box_id: None,
            notes: String::new(),
            site_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn patient(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.patient = Some(PatientRef {
            id: id.into(),
            name: Some(name.into()),
        });
        self
    }

    pub fn professional(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.professional = Some(ProfessionalRef {
            id: id.into(),
            name: Some(name.into()),
        });
        self
    }

    pub fn treatment(mut self, treatment_id: impl Into<String>) -> Self {
        self.treatment_id = Some(treatment_id.into());
        self
    }

    pub fn box_id(mut self, box_id: impl Into<String>) -> Self {
        self.box_id = Some(box_id.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Build the appointment; `end` is derived from start + duration
    pub fn build(self) -> Result<Appointment, String> {
        let id = self.id.ok_or("Appointment id is required")?;
        let start = self.start.ok_or("Appointment start is required")?;
        let duration_minutes = self.duration_minutes.ok_or("Appointment duration is required")?;
        let professional = self.professional.ok_or("Appointment professional is required")?;

        let appointment = Appointment {
            id,
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
            duration_minutes,
            status: self.status,
            patient: self.patient.unwrap_or_default(),
            professional,
            treatment_id: self.treatment_id,
            box_id: self.box_id,
            notes: self.notes,
            site_id: self.site_id,
        };

        appointment.validate()?;
        Ok(appointment)
    }
}

impl Default for AppointmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sample() -> Appointment {
        Appointment::builder()
            .id("a-1")
            .start(at(10, 0))
            .duration_minutes(45)
            .patient("pat-1", "Lucía Romero")
            .professional("pro-1", "Dr. Vega")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_derives_end() {
        let appt = sample();
        assert_eq!(appt.end, at(10, 45));
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert!(appt.validate().is_ok());
    }

    #[test]
    fn test_builder_requires_professional() {
        let result = Appointment::builder()
            .id("a-1")
            .start(at(10, 0))
            .duration_minutes(30)
            .build();
        assert_eq!(result.unwrap_err(), "Appointment professional is required");
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let mut appt = sample();
        appt.duration_minutes = 0;
        appt.end = appt.start;
        assert!(appt.validate().is_err());
    }

    #[test]
    fn test_validate_detects_end_mismatch() {
        let mut appt = sample();
        appt.end = at(11, 0);
        let err = appt.validate().unwrap_err();
        assert!(err.contains("does not match"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(!AppointmentStatus::Scheduled.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(!AppointmentStatus::NoShow.is_terminal());
    }

    #[test]
    fn test_column_id_by_grouping() {
        let mut appt = sample();
        assert_eq!(appt.column_id(GroupBy::Professional), "pro-1");
        assert_eq!(appt.column_id(GroupBy::Box), UNASSIGNED_BOX_ID);

        appt.box_id = Some("  ".to_string());
        assert_eq!(appt.column_id(GroupBy::Box), UNASSIGNED_BOX_ID);

        appt.box_id = Some("4".to_string());
        assert_eq!(appt.column_id(GroupBy::Box), "4");
    }

    #[test]
    fn test_deserializes_rest_field_names() {
        let json = r#"{
            "id": "c-9",
            "fecha_hora_inicio": "2025-03-10T09:30:00",
            "fecha_hora_fin": "2025-03-10T10:00:00",
            "duracion_minutos": 30,
            "estado": "confirmada",
            "paciente": { "id": "pat-2", "nombre": "Marta Gil" },
            "profesional": { "id": "pro-2" },
            "box_asignado": "3"
        }"#;

        let appt: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        assert_eq!(appt.assigned_box(), Some("3"));
        assert_eq!(appt.professional.label(), "pro-2");
        assert_eq!(appt.patient_label(), "Marta Gil");
        assert!(appt.validate().is_ok());
    }

    #[test]
    fn test_status_display_matches_wire_name() {
        assert_eq!(AppointmentStatus::NoShow.to_string(), "no-show");
        let parsed: AppointmentStatus = serde_json::from_str("\"no-show\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::NoShow);
    }
}
