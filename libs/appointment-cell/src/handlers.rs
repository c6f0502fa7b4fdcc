// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use settings_cell::AppState;
use shared_models::error::AppError;
use shared_models::time::ClockTime;

use crate::models::{
    AppointmentError, AppointmentStatus, AvailabilityRequest, AvailabilityResponse,
    CreateAppointmentRequest, OccupancyReport, RescheduleAppointmentRequest, SuggestionsResponse,
    UpdateStatusRequest,
};
use crate::services::{AppointmentBookingService, AvailabilityService};

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            AppointmentError::ValidationError(msg) => AppError::BadRequest(msg),
            AppointmentError::ConflictDetected { message, conflicts, suggestions } => {
                AppError::ConflictDetails {
                    message,
                    details: json!({
                        "conflicts": conflicts,
                        "sugerencias": suggestions
                    }),
                }
            }
            AppointmentError::SlotTaken => AppError::Conflict(AppointmentError::SlotTaken.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
            AppointmentError::Settings(e) => AppError::from(e),
        }
    }
}

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

// Query and body fields stay as raw strings so a bad value gets a descriptive
// 400 instead of the extractor's generic rejection.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub time: Option<String>,
    pub service_id: Option<String>,
    pub allow_overlap: Option<String>,
    pub exclude_appointment_id: Option<String>,
}

impl AvailabilityQuery {
    pub fn validate(self) -> Result<AvailabilityRequest, AppError> {
        Ok(AvailabilityRequest {
            date: parse_date(required("date", self.date)?)?,
            time: parse_time(required("time", self.time)?)?,
            service_id: parse_optional_uuid("serviceId", self.service_id)?,
            allow_overlap: parse_flag("allowOverlap", self.allow_overlap)?,
            exclude_appointment_id: parse_optional_uuid("excludeAppointmentId", self.exclude_appointment_id)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionQuery {
    pub date: Option<String>,
    pub service_id: Option<String>,
    pub exclude_appointment_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OccupancyQuery {
    pub date: Option<String>,
}

// ==============================================================================
// REQUEST BODY STRUCTS
// ==============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateAppointmentBody {
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service_label: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub reminder: Option<bool>,
    pub allow_overlap: Option<bool>,
}

impl CreateAppointmentBody {
    pub fn validate(self) -> Result<CreateAppointmentRequest, AppError> {
        Ok(CreateAppointmentRequest {
            client_id: parse_uuid("client_id", required("client_id", self.client_id)?)?,
            service_id: parse_optional_uuid("service_id", self.service_id)?,
            date: parse_date(required("date", self.date)?)?,
            time: parse_time(required("time", self.time)?)?,
            service_label: self.service_label,
            price: self.price,
            notes: self.notes,
            reminder: self.reminder.unwrap_or(false),
            allow_overlap: self.allow_overlap.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RescheduleAppointmentBody {
    pub date: Option<String>,
    pub time: Option<String>,
    pub allow_overlap: Option<bool>,
}

impl RescheduleAppointmentBody {
    pub fn validate(self) -> Result<RescheduleAppointmentRequest, AppError> {
        let date = match self.date.filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(parse_date(raw)?),
            None => None,
        };

        Ok(RescheduleAppointmentRequest {
            date,
            time: parse_time(required("time", self.time)?)?,
            allow_overlap: self.allow_overlap.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
    pub allow_overlap: Option<bool>,
}

impl UpdateStatusBody {
    pub fn validate(self) -> Result<UpdateStatusRequest, AppError> {
        let status: AppointmentStatus = required("status", self.status)?.parse()?;

        Ok(UpdateStatusRequest {
            status,
            allow_overlap: self.allow_overlap.unwrap_or(false),
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required parameter '{}'", name)))
}

fn parse_date(raw: String) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

fn parse_time(raw: String) -> Result<ClockTime, AppError> {
    raw.parse::<ClockTime>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_uuid(name: &str, raw: String) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid {} '{}'", name, raw)))
}

fn parse_optional_uuid(name: &str, raw: Option<String>) -> Result<Option<Uuid>, AppError> {
    match raw.filter(|v| !v.trim().is_empty()) {
        Some(value) => parse_uuid(name, value).map(Some),
        None => Ok(None),
    }
}

fn parse_flag(name: &str, raw: Option<String>) -> Result<bool, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(AppError::BadRequest(format!("Invalid {} '{}', expected true or false", name, other))),
    }
}

// ==============================================================================
// AVAILABILITY HANDLERS (READ-ONLY)
// ==============================================================================

#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let request = query.validate()?;

    let response = AvailabilityService::new(&state)
        .check_availability(&request)
        .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let date = parse_date(required("date", query.date)?)?;
    let service_id = parse_optional_uuid("serviceId", query.service_id)?;
    let exclude_id = parse_optional_uuid("excludeAppointmentId", query.exclude_appointment_id)?;

    let response = AvailabilityService::new(&state)
        .suggest_slots(date, service_id, exclude_id)
        .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_occupancy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OccupancyQuery>,
) -> Result<Json<OccupancyReport>, AppError> {
    let date = parse_date(required("date", query.date)?)?;

    let report = AvailabilityService::new(&state).occupancy(date).await?;
    Ok(Json(report))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAppointmentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = payload?;
    let request = body.validate()?;

    let appointment = AppointmentBookingService::new(&state)
        .create_appointment(request)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully"
    }))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = AppointmentBookingService::new(&state)
        .get_appointment(appointment_id)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    payload: Result<Json<RescheduleAppointmentBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;
    let request = body.validate()?;

    let appointment = AppointmentBookingService::new(&state)
        .reschedule_appointment(appointment_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment rescheduled successfully"
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    payload: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;
    let request = body.validate()?;

    let appointment = AppointmentBookingService::new(&state)
        .update_status(appointment_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    AppointmentBookingService::new(&state)
        .delete_appointment(appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted"
    })))
}
