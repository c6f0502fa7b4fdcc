// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use settings_cell::SettingsError;
use shared_database::supabase::DatabaseError;
use shared_models::time::ClockTime;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Option<Uuid>,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub service_label: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reminder: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AppointmentStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "CONFIRMADA")]
    Confirmed,
    #[serde(rename = "REALIZADA")]
    Done,
    #[serde(rename = "CANCELADA")]
    Cancelled,
    #[serde(rename = "REPROGRAMADA")]
    Rescheduled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Done,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Rescheduled,
    ];

    /// Wire / column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDIENTE",
            AppointmentStatus::Confirmed => "CONFIRMADA",
            AppointmentStatus::Done => "REALIZADA",
            AppointmentStatus::Cancelled => "CANCELADA",
            AppointmentStatus::Rescheduled => "REPROGRAMADA",
        }
    }

    /// Still expected to happen; the only statuses that can hard-conflict.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(AppointmentStatus::as_str).collect();
                AppointmentError::ValidationError(format!(
                    "Invalid status '{}', expected one of {}",
                    raw,
                    known.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub sale_price: f64,
    pub duration_minutes: u32,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub uses_inventory: bool,
}

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConflictKind {
    /// Same start time as an active appointment.
    #[serde(rename = "exacto")]
    Exact,
    /// Occupied intervals intersect.
    #[serde(rename = "superposicion")]
    Overlap,
    /// Disjoint, but closer than the minimum interval.
    #[serde(rename = "intervalo_insuficiente")]
    InsufficientSpacing,
}

impl ConflictKind {
    pub fn intersects(&self) -> bool {
        matches!(self, ConflictKind::Exact | ConflictKind::Overlap)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conflict {
    pub id: Uuid,
    #[serde(rename = "hora")]
    pub time: ClockTime,
    #[serde(rename = "duracion")]
    pub duration_minutes: u32,
    #[serde(rename = "tipo")]
    pub kind: ConflictKind,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "servicio")]
    pub service_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
    #[serde(rename = "superposiciones", default, skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<Conflict>,
    #[serde(rename = "sugerencias", default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<ClockTime>,
    #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "tiempoTotalOcupado", default, skip_serializing_if = "Option::is_none")]
    pub total_occupied_minutes: Option<u32>,
    #[serde(rename = "duracion")]
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionsResponse {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "duracion")]
    pub duration_minutes: u32,
    #[serde(rename = "sugerencias")]
    pub suggestions: Vec<ClockTime>,
}

// ==============================================================================
// OCCUPANCY MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    #[serde(rename = "PENDIENTE")]
    pub pending: usize,
    #[serde(rename = "CONFIRMADA")]
    pub confirmed: usize,
    #[serde(rename = "REALIZADA")]
    pub done: usize,
    #[serde(rename = "CANCELADA")]
    pub cancelled: usize,
    #[serde(rename = "REPROGRAMADA")]
    pub rescheduled: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: AppointmentStatus) {
        match status {
            AppointmentStatus::Pending => self.pending += 1,
            AppointmentStatus::Confirmed => self.confirmed += 1,
            AppointmentStatus::Done => self.done += 1,
            AppointmentStatus::Cancelled => self.cancelled += 1,
            AppointmentStatus::Rescheduled => self.rescheduled += 1,
        }
    }

    pub fn get(&self, status: AppointmentStatus) -> usize {
        match status {
            AppointmentStatus::Pending => self.pending,
            AppointmentStatus::Confirmed => self.confirmed,
            AppointmentStatus::Done => self.done,
            AppointmentStatus::Cancelled => self.cancelled,
            AppointmentStatus::Rescheduled => self.rescheduled,
        }
    }
}

/// Start time shared by more than one non-cancelled appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeConflict {
    #[serde(rename = "hora")]
    pub time: ClockTime,
    #[serde(rename = "citas")]
    pub appointment_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedRevenue {
    #[serde(rename = "totales")]
    pub realized: String,
    #[serde(rename = "estimados")]
    pub estimated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OccupancyReport {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "totalCitas")]
    pub total_appointments: usize,
    #[serde(rename = "citasPorEstado")]
    pub by_status: StatusCounts,
    #[serde(rename = "ingresosTotales")]
    pub realized_revenue: f64,
    #[serde(rename = "ingresosEstimados")]
    pub estimated_revenue: f64,
    #[serde(rename = "ingresosFormateados")]
    pub formatted_revenue: FormattedRevenue,
    #[serde(rename = "tiempoTotalOcupado")]
    pub total_occupied_minutes: u32,
    #[serde(rename = "porcentajeOcupacion")]
    pub utilization_percent: f64,
    #[serde(rename = "conflictos")]
    pub conflicts: Vec<TimeConflict>,
    #[serde(rename = "horariosLibres")]
    pub free_slots: Vec<ClockTime>,
    #[serde(rename = "citas")]
    pub appointments: Vec<Appointment>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Validated availability check.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    pub date: NaiveDate,
    pub time: ClockTime,
    pub service_id: Option<Uuid>,
    pub allow_overlap: bool,
    pub exclude_appointment_id: Option<Uuid>,
}

/// Validated booking request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAppointmentRequest {
    pub client_id: Uuid,
    pub service_id: Option<Uuid>,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub service_label: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub reminder: bool,
    pub allow_overlap: bool,
}

/// Validated move; `date` defaults to the appointment's current day.
#[derive(Debug, Clone, PartialEq)]
pub struct RescheduleAppointmentRequest {
    pub date: Option<NaiveDate>,
    pub time: ClockTime,
    pub allow_overlap: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
    pub allow_overlap: bool,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("{0}")]
    ValidationError(String),

    #[error("{message}")]
    ConflictDetected {
        message: String,
        conflicts: Vec<Conflict>,
        suggestions: Vec<ClockTime>,
    },

    /// The store refused the row because the date and time are already booked.
    #[error("This date and time is already booked")]
    SlotTaken,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl From<DatabaseError> for AppointmentError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::Conflict(_) => AppointmentError::SlotTaken,
            other => AppointmentError::DatabaseError(other.to_string()),
        }
    }
}
