use std::collections::HashMap;

use uuid::Uuid;

use shared_models::time::{ClockTime, MINUTES_PER_DAY};

use crate::models::{Appointment, Service};

/// Half-open span of minutes since midnight, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: ClockTime, duration_minutes: u32) -> Self {
        let start = start.minutes();
        Self { start, end: start.saturating_add(duration_minutes) }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Free minutes between two disjoint intervals; `None` when they intersect.
    pub fn gap_to(&self, other: &Interval) -> Option<u32> {
        if self.end <= other.start {
            Some(other.start - self.end)
        } else if other.end <= self.start {
            Some(self.start - other.end)
        } else {
            None
        }
    }

    /// True when the two intervals are disjoint but closer than `min_gap`.
    /// Touching intervals (gap of zero) are not a violation.
    pub fn too_close_to(&self, other: &Interval, min_gap: u32) -> bool {
        matches!(self.gap_to(other), Some(gap) if gap > 0 && gap < min_gap)
    }
}

/// Span covering every interval given, `max(end) - min(start)`.
pub fn union_span<'a>(intervals: impl IntoIterator<Item = &'a Interval>) -> Option<u32> {
    let mut iter = intervals.into_iter();
    let first = iter.next()?;
    let (start, end) = iter.fold((first.start, first.end), |(start, end), interval| {
        (start.min(interval.start), end.max(interval.end))
    });
    Some(end - start)
}

/// An appointment placed on the day's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAppointment {
    pub appointment: Appointment,
    pub interval: Interval,
}

impl ScheduledAppointment {
    pub fn duration_minutes(&self) -> u32 {
        self.interval.len()
    }
}

/// Service durations keyed by id, with the fallback for unknown services.
/// Durations outside one day are ignored and take the fallback.
#[derive(Debug, Clone)]
pub struct DurationTable {
    durations: HashMap<Uuid, u32>,
    default_minutes: u32,
}

impl DurationTable {
    pub fn new(services: &[Service], default_minutes: u32) -> Self {
        Self {
            durations: services
                .iter()
                .filter(|service| (1..=MINUTES_PER_DAY).contains(&service.duration_minutes))
                .map(|service| (service.id, service.duration_minutes))
                .collect(),
            default_minutes,
        }
    }

    pub fn duration_for(&self, service_id: Option<Uuid>) -> u32 {
        service_id
            .and_then(|id| self.durations.get(&id).copied())
            .unwrap_or(self.default_minutes)
    }

    pub fn place(&self, appointment: Appointment) -> ScheduledAppointment {
        let interval = Interval::new(appointment.time, self.duration_for(appointment.service_id));
        ScheduledAppointment { appointment, interval }
    }

    /// Place a day's appointments, ordered by start time.
    pub fn schedule(&self, appointments: Vec<Appointment>) -> Vec<ScheduledAppointment> {
        let mut day: Vec<ScheduledAppointment> = appointments
            .into_iter()
            .map(|appointment| self.place(appointment))
            .collect();
        day.sort_by_key(|entry| entry.interval);
        day
    }
}
