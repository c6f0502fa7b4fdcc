use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use settings_cell::{AppState, SalonSettings, SettingsService};
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, AvailabilityRequest, AvailabilityResponse, OccupancyReport,
    Service, SuggestionsResponse,
};
use crate::services::conflict::{AvailabilityOutcome, ConflictDetectionService};
use crate::services::occupancy::OccupancyReporter;
use crate::services::suggestion::SlotSuggester;
use crate::services::timeline::{DurationTable, Interval, ScheduledAppointment};

pub const APPOINTMENTS_TABLE: &str = "appointments";
pub const SERVICES_TABLE: &str = "services";

/// Snapshot of one calendar day, read once per request.
pub struct DaySnapshot {
    pub settings: SalonSettings,
    pub durations: DurationTable,
    pub appointments: Vec<ScheduledAppointment>,
}

impl DaySnapshot {
    pub fn occupied(&self) -> Vec<Interval> {
        self.appointments
            .iter()
            .filter(|entry| !entry.appointment.status.is_cancelled())
            .map(|entry| entry.interval)
            .collect()
    }
}

pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
    settings: SettingsService,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.supabase.clone(),
            settings: state.settings_service(),
        }
    }

    /// Decide whether the requested slot can be booked.
    pub async fn check_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResponse, AppointmentError> {
        debug!("Checking availability on {} at {}", request.date, request.time);

        let snapshot = self.load_day(
            request.date,
            request.exclude_appointment_id,
            false,
            request.service_id,
        ).await?;

        let duration = snapshot.durations.duration_for(request.service_id);
        let detector = ConflictDetectionService::new(snapshot.settings.min_interval_minutes);

        let response = match detector.evaluate(
            request.time,
            duration,
            request.allow_overlap,
            &snapshot.appointments,
        ) {
            AvailabilityOutcome::Available { overlaps, total_occupied_minutes } => AvailabilityResponse {
                available: true,
                conflicts: Vec::new(),
                overlaps,
                suggestions: Vec::new(),
                message: None,
                total_occupied_minutes,
                duration_minutes: duration,
            },
            AvailabilityOutcome::Unavailable { conflicts, message } => AvailabilityResponse {
                available: false,
                conflicts,
                overlaps: Vec::new(),
                suggestions: SlotSuggester::from_settings(&snapshot.settings)
                    .suggest(&snapshot.occupied(), duration),
                message: Some(message),
                total_occupied_minutes: None,
                duration_minutes: duration,
            },
        };

        Ok(response)
    }

    /// Free start times for a day, sized for the given service.
    pub async fn suggest_slots(
        &self,
        date: NaiveDate,
        service_id: Option<Uuid>,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<SuggestionsResponse, AppointmentError> {
        let snapshot = self.load_day(date, exclude_appointment_id, false, service_id).await?;
        let duration = snapshot.durations.duration_for(service_id);

        Ok(SuggestionsResponse {
            date,
            duration_minutes: duration,
            suggestions: SlotSuggester::from_settings(&snapshot.settings)
                .suggest(&snapshot.occupied(), duration),
        })
    }

    pub async fn occupancy(&self, date: NaiveDate) -> Result<OccupancyReport, AppointmentError> {
        debug!("Building occupancy report for {}", date);

        let snapshot = self.load_day(date, None, true, None).await?;
        Ok(OccupancyReporter::new(snapshot.settings).report(date, snapshot.appointments))
    }

    pub async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, AppointmentError> {
        let services: Vec<Service> = self.supabase
            .select(SERVICES_TABLE, &format!("id=eq.{}", service_id))
            .await?;
        Ok(services.into_iter().next())
    }

    pub async fn load_day(
        &self,
        date: NaiveDate,
        exclude_appointment_id: Option<Uuid>,
        include_cancelled: bool,
        extra_service_id: Option<Uuid>,
    ) -> Result<DaySnapshot, AppointmentError> {
        let (settings, appointments) = tokio::try_join!(
            async { self.settings.current().await.map_err(AppointmentError::from) },
            self.fetch_day_appointments(date, exclude_appointment_id, include_cancelled),
        )?;

        let mut service_ids: Vec<Uuid> = appointments
            .iter()
            .filter_map(|appointment| appointment.service_id)
            .chain(extra_service_id)
            .collect();
        service_ids.sort();
        service_ids.dedup();

        let services = self.fetch_services(&service_ids).await?;
        let durations = DurationTable::new(&services, settings.default_duration_minutes);
        let appointments = durations.schedule(appointments);

        Ok(DaySnapshot { settings, durations, appointments })
    }

    async fn fetch_day_appointments(
        &self,
        date: NaiveDate,
        exclude_appointment_id: Option<Uuid>,
        include_cancelled: bool,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut query_parts = vec![format!("date=eq.{}", date.format("%Y-%m-%d"))];

        if !include_cancelled {
            query_parts.push("status=neq.CANCELADA".to_string());
        }

        if let Some(exclude_id) = exclude_appointment_id {
            query_parts.push(format!("id=neq.{}", exclude_id));
        }

        query_parts.push("order=time.asc".to_string());

        let appointments: Vec<Appointment> = self.supabase
            .select(APPOINTMENTS_TABLE, &query_parts.join("&"))
            .await?;

        // Cancelled rows never reach the timeline
        Ok(appointments
            .into_iter()
            .filter(|appointment| include_cancelled || !appointment.status.is_cancelled())
            .collect())
    }

    async fn fetch_services(&self, service_ids: &[Uuid]) -> Result<Vec<Service>, AppointmentError> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = service_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let services: Vec<Service> = self.supabase
            .select(SERVICES_TABLE, &format!("id=in.({})", ids))
            .await?;
        Ok(services)
    }
}
