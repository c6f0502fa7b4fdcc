use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use settings_cell::SalonSettings;
use shared_models::time::ClockTime;

use crate::models::{
    AppointmentStatus, FormattedRevenue, OccupancyReport, StatusCounts, TimeConflict,
};
use crate::services::timeline::ScheduledAppointment;

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregates one day's appointments, cancelled ones included, into statistics.
pub struct OccupancyReporter {
    settings: SalonSettings,
}

impl OccupancyReporter {
    pub fn new(settings: SalonSettings) -> Self {
        Self { settings }
    }

    pub fn report(&self, date: NaiveDate, day: Vec<ScheduledAppointment>) -> OccupancyReport {
        let mut by_status = StatusCounts::default();
        let mut realized_revenue = 0.0;
        let mut estimated_revenue = 0.0;
        let mut total_occupied_minutes = 0;
        let mut active_count: u32 = 0;
        let mut starts: BTreeMap<ClockTime, Vec<Uuid>> = BTreeMap::new();

        for entry in &day {
            let appointment = &entry.appointment;
            by_status.record(appointment.status);

            match appointment.status {
                AppointmentStatus::Done => realized_revenue += appointment.price,
                AppointmentStatus::Pending | AppointmentStatus::Confirmed => {
                    estimated_revenue += appointment.price
                }
                _ => {}
            }

            if appointment.status.is_cancelled() {
                continue;
            }

            active_count += 1;
            total_occupied_minutes += entry.duration_minutes();
            starts.entry(appointment.time).or_default().push(appointment.id);
        }

        let conflicts = starts
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(time, ids)| TimeConflict { time: *time, appointment_ids: ids.clone() })
            .collect();

        let free_slots = self.free_slots(|slot| starts.contains_key(&slot));

        let utilization_percent = round_cents(
            active_count as f64 / self.settings.utilization_slots.max(1) as f64 * 100.0,
        );

        let realized_revenue = round_cents(realized_revenue);
        let estimated_revenue = round_cents(estimated_revenue);

        OccupancyReport {
            date,
            total_appointments: day.len(),
            by_status,
            realized_revenue,
            estimated_revenue,
            formatted_revenue: FormattedRevenue {
                realized: self.settings.format_currency(realized_revenue),
                estimated: self.settings.format_currency(estimated_revenue),
            },
            total_occupied_minutes,
            utilization_percent,
            conflicts,
            free_slots,
            appointments: day.into_iter().map(|entry| entry.appointment).collect(),
        }
    }

    /// Fixed grid of slots in the occupancy window not used as a start time.
    fn free_slots(&self, taken: impl Fn(ClockTime) -> bool) -> Vec<ClockTime> {
        let step = self.settings.occupancy_slot_minutes.max(1);
        let end = self.settings.occupancy_window_end.minutes();

        (self.settings.occupancy_window_start.minutes()..end)
            .step_by(step as usize)
            .filter_map(ClockTime::from_minutes)
            .filter(|slot| !taken(*slot))
            .collect()
    }
}
