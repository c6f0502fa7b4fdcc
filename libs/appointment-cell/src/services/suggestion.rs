use tracing::debug;

use settings_cell::SalonSettings;
use shared_models::time::ClockTime;

use crate::services::timeline::Interval;

/// Greedy forward scan for free start times inside the business window.
///
/// Candidates are tried every `step` minutes from the window start and kept
/// when they fit the window, intersect nothing and respect the spacing rule on
/// both sides. This is not an optimal packing.
pub struct SlotSuggester {
    window_start: ClockTime,
    window_end: ClockTime,
    step_minutes: u32,
    min_interval_minutes: u32,
    max_suggestions: usize,
}

impl SlotSuggester {
    pub fn new(
        window_start: ClockTime,
        window_end: ClockTime,
        min_interval_minutes: u32,
        max_suggestions: usize,
    ) -> Self {
        Self {
            window_start,
            window_end,
            step_minutes: min_interval_minutes.max(1),
            min_interval_minutes,
            max_suggestions,
        }
    }

    pub fn from_settings(settings: &SalonSettings) -> Self {
        Self::new(
            settings.suggestion_window_start,
            settings.suggestion_window_end,
            settings.min_interval_minutes,
            settings.max_suggestions,
        )
    }

    pub fn fits(&self, candidate: &Interval, occupied: &[Interval]) -> bool {
        candidate.end <= self.window_end.minutes()
            && occupied.iter().all(|other| {
                !candidate.intersects(other) && !candidate.too_close_to(other, self.min_interval_minutes)
            })
    }

    /// Up to `max_suggestions` start times for a block of `block_minutes`, earliest first.
    pub fn suggest(&self, occupied: &[Interval], block_minutes: u32) -> Vec<ClockTime> {
        let mut suggestions = Vec::new();
        let mut minutes = self.window_start.minutes();

        while suggestions.len() < self.max_suggestions && minutes + block_minutes <= self.window_end.minutes() {
            let Some(start) = ClockTime::from_minutes(minutes) else {
                break;
            };

            if self.fits(&Interval::new(start, block_minutes), occupied) {
                suggestions.push(start);
            }

            minutes += self.step_minutes;
        }

        debug!("Suggested {} slot(s) for a {} minute block", suggestions.len(), block_minutes);
        suggestions
    }
}
