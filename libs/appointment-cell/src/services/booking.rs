use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use settings_cell::AppState;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, AvailabilityRequest,
    CreateAppointmentRequest, RescheduleAppointmentRequest, UpdateStatusRequest,
};
use crate::services::availability::{AvailabilityService, APPOINTMENTS_TABLE};

/// Write paths for appointments. Every path that can place an appointment on
/// the timeline re-runs the availability check first.
///
/// The check and the write are not atomic. The store is expected to enforce
/// a unique (date, time) index over non-cancelled rows; its 409 surfaces here
/// as `AppointmentError::SlotTaken`. That index also refuses a second row at
/// an exact start time that `allow_overlap` let through the check, so an
/// allowed overlap can only be written at a different start time.
pub struct AppointmentBookingService {
    supabase: Arc<SupabaseClient>,
    availability: AvailabilityService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.supabase.clone(),
            availability: AvailabilityService::new(state),
        }
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let rows: Vec<Appointment> = self.supabase
            .select(APPOINTMENTS_TABLE, &format!("id=eq.{}", appointment_id))
            .await?;

        rows.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if let Some(price) = request.price {
            if price < 0.0 || !price.is_finite() {
                return Err(AppointmentError::ValidationError("price must be a non-negative amount".to_string()));
            }
        }

        let service = match request.service_id {
            Some(service_id) => Some(
                self.availability.get_service(service_id).await?
                    .ok_or_else(|| AppointmentError::ValidationError(format!("Unknown service {}", service_id)))?,
            ),
            None => None,
        };

        self.ensure_available(AvailabilityRequest {
            date: request.date,
            time: request.time,
            service_id: request.service_id,
            allow_overlap: request.allow_overlap,
            exclude_appointment_id: None,
        }).await?;

        let service_label = request.service_label
            .or_else(|| service.as_ref().map(|s| s.name.clone()));
        let price = request.price
            .or_else(|| service.as_ref().map(|s| s.sale_price))
            .unwrap_or(0.0);

        let row = json!({
            "client_id": request.client_id,
            "service_id": request.service_id,
            "date": request.date,
            "time": request.time,
            "status": AppointmentStatus::Pending,
            "service_label": service_label,
            "price": price,
            "notes": request.notes,
            "reminder": request.reminder,
        });

        let appointment: Appointment = self.supabase.insert(APPOINTMENTS_TABLE, row).await?;
        info!("Booked appointment {} on {} at {}", appointment.id, appointment.date, appointment.time);

        Ok(appointment)
    }

    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let existing = self.get_appointment(appointment_id).await?;

        if existing.status.is_cancelled() || existing.status == AppointmentStatus::Done {
            return Err(AppointmentError::ValidationError(format!(
                "Cannot reschedule an appointment in status {}",
                existing.status
            )));
        }

        let date = request.date.unwrap_or(existing.date);
        let time = request.time;

        self.ensure_available(AvailabilityRequest {
            date,
            time,
            service_id: existing.service_id,
            allow_overlap: request.allow_overlap,
            exclude_appointment_id: Some(appointment_id),
        }).await?;

        let appointment: Appointment = self.supabase
            .update(
                APPOINTMENTS_TABLE,
                &appointment_id.to_string(),
                json!({
                    "date": date,
                    "time": time,
                    "status": AppointmentStatus::Rescheduled,
                }),
            )
            .await?;

        info!("Rescheduled appointment {} to {} at {}", appointment_id, date, time);
        Ok(appointment)
    }

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        request: UpdateStatusRequest,
    ) -> Result<Appointment, AppointmentError> {
        let existing = self.get_appointment(appointment_id).await?;
        debug!("Status change for {}: {} -> {}", appointment_id, existing.status, request.status);

        // Re-activating a row puts it back on the timeline
        if request.status.is_active() && !existing.status.is_active() {
            self.ensure_available(AvailabilityRequest {
                date: existing.date,
                time: existing.time,
                service_id: existing.service_id,
                allow_overlap: request.allow_overlap,
                exclude_appointment_id: Some(appointment_id),
            }).await?;
        }

        let appointment: Appointment = self.supabase
            .update(
                APPOINTMENTS_TABLE,
                &appointment_id.to_string(),
                json!({ "status": request.status }),
            )
            .await?;

        Ok(appointment)
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        self.supabase
            .delete(APPOINTMENTS_TABLE, &appointment_id.to_string())
            .await
            .map_err(|e| match e {
                shared_database::DatabaseError::NotFound(_) => AppointmentError::NotFound,
                other => AppointmentError::from(other),
            })?;

        info!("Deleted appointment {}", appointment_id);
        Ok(())
    }

    async fn ensure_available(&self, request: AvailabilityRequest) -> Result<(), AppointmentError> {
        let response = self.availability.check_availability(&request).await?;

        if response.available {
            return Ok(());
        }

        warn!("Rejected booking on {} at {}: {} conflict(s)",
              request.date, request.time, response.conflicts.len());

        Err(AppointmentError::ConflictDetected {
            message: response.message
                .unwrap_or_else(|| "Appointment slot conflicts with existing booking".to_string()),
            conflicts: response.conflicts,
            suggestions: response.suggestions,
        })
    }
}
