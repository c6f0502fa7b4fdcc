use tracing::{debug, warn};

use shared_models::time::ClockTime;

use crate::models::{Conflict, ConflictKind};
use crate::services::timeline::{union_span, Interval, ScheduledAppointment};

/// Result of checking one candidate against a day snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityOutcome {
    Available {
        /// Intersecting appointments accepted because overlap was allowed.
        overlaps: Vec<Conflict>,
        /// Union span of the candidate and `overlaps`, when there are any.
        total_occupied_minutes: Option<u32>,
    },
    Unavailable {
        conflicts: Vec<Conflict>,
        message: String,
    },
}

impl AvailabilityOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityOutcome::Available { .. })
    }
}

/// Classifies existing appointments against a proposed one.
///
/// Works purely on an in-memory snapshot of the day, so the same input
/// always produces the same outcome.
pub struct ConflictDetectionService {
    min_interval_minutes: u32,
}

impl ConflictDetectionService {
    pub fn new(min_interval_minutes: u32) -> Self {
        Self { min_interval_minutes }
    }

    /// Place `other` into exactly one conflict class, or none.
    pub fn classify(&self, candidate: &Interval, other: &ScheduledAppointment) -> Option<ConflictKind> {
        if candidate.start == other.interval.start && other.appointment.status.is_active() {
            Some(ConflictKind::Exact)
        } else if candidate.intersects(&other.interval) {
            Some(ConflictKind::Overlap)
        } else if candidate.too_close_to(&other.interval, self.min_interval_minutes) {
            Some(ConflictKind::InsufficientSpacing)
        } else {
            None
        }
    }

    /// Check a candidate start time against the day's non-cancelled appointments.
    pub fn evaluate(
        &self,
        time: ClockTime,
        duration_minutes: u32,
        allow_overlap: bool,
        day: &[ScheduledAppointment],
    ) -> AvailabilityOutcome {
        let candidate = Interval::new(time, duration_minutes);
        debug!("Evaluating {} for {} minutes against {} appointments", time, duration_minutes, day.len());

        let mut exact = Vec::new();
        let mut soft = Vec::new();

        for entry in day.iter().filter(|entry| !entry.appointment.status.is_cancelled()) {
            let Some(kind) = self.classify(&candidate, entry) else {
                continue;
            };

            let conflict = Conflict {
                id: entry.appointment.id,
                time: entry.appointment.time,
                duration_minutes: entry.duration_minutes(),
                kind,
                status: entry.appointment.status,
                service_label: entry.appointment.service_label.clone(),
            };

            match kind {
                ConflictKind::Exact => exact.push((conflict, entry.interval)),
                ConflictKind::Overlap | ConflictKind::InsufficientSpacing => soft.push((conflict, entry.interval)),
            }
        }

        if !allow_overlap {
            if !exact.is_empty() {
                warn!("Exact conflict at {} with {} appointment(s)", time, exact.len());
                return AvailabilityOutcome::Unavailable {
                    conflicts: exact.into_iter().map(|(conflict, _)| conflict).collect(),
                    message: format!("There is already an appointment at {}", time),
                };
            }

            if !soft.is_empty() {
                let overlapping = soft.iter().filter(|(c, _)| c.kind == ConflictKind::Overlap).count();
                warn!("{} overlap(s) and {} spacing violation(s) at {}",
                      overlapping, soft.len() - overlapping, time);

                let message = if overlapping > 0 {
                    format!("The requested time {} overlaps existing appointments", time)
                } else {
                    format!(
                        "Appointments must be at least {} minutes apart",
                        self.min_interval_minutes
                    )
                };

                return AvailabilityOutcome::Unavailable {
                    conflicts: soft.into_iter().map(|(conflict, _)| conflict).collect(),
                    message,
                };
            }
        }

        let intersecting: Vec<(Conflict, Interval)> = exact
            .into_iter()
            .chain(soft)
            .filter(|(conflict, _)| conflict.kind.intersects())
            .collect();

        let total_occupied_minutes = if intersecting.is_empty() {
            None
        } else {
            union_span(
                std::iter::once(&candidate).chain(intersecting.iter().map(|(_, interval)| interval)),
            )
        };

        AvailabilityOutcome::Available {
            overlaps: intersecting.into_iter().map(|(conflict, _)| conflict).collect(),
            total_occupied_minutes,
        }
    }
}
