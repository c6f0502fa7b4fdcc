use serde::{Deserialize, Serialize};

use shared_models::time::{ClockTime, MINUTES_PER_DAY};

/// Business settings of the salon, stored as a single `salon_settings` row.
///
/// Every field falls back to its default when the column is missing or
/// `NULL`, so a partially filled row (or no row at all) still yields usable
/// settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SalonSettingsRow")]
pub struct SalonSettings {
    pub currency_symbol: String,
    pub currency_code: String,
    /// Minimum gap between two appointments.
    pub min_interval_minutes: u32,
    /// Footprint of an appointment without a known service.
    pub default_duration_minutes: u32,
    pub suggestion_window_start: ClockTime,
    pub suggestion_window_end: ClockTime,
    pub max_suggestions: usize,
    pub occupancy_window_start: ClockTime,
    pub occupancy_window_end: ClockTime,
    pub occupancy_slot_minutes: u32,
    /// Denominator of the utilization percentage.
    pub utilization_slots: u32,
}

impl Default for SalonSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            currency_code: "USD".to_string(),
            min_interval_minutes: 30,
            default_duration_minutes: 30,
            suggestion_window_start: ClockTime::at(9, 0),
            suggestion_window_end: ClockTime::at(20, 0),
            max_suggestions: 8,
            occupancy_window_start: ClockTime::at(8, 0),
            occupancy_window_end: ClockTime::at(20, 0),
            occupancy_slot_minutes: 30,
            utilization_slots: 26,
        }
    }
}

/// Raw `salon_settings` row; every column is nullable.
#[derive(Debug, Default, Deserialize)]
struct SalonSettingsRow {
    currency_symbol: Option<String>,
    currency_code: Option<String>,
    min_interval_minutes: Option<u32>,
    default_duration_minutes: Option<u32>,
    suggestion_window_start: Option<ClockTime>,
    suggestion_window_end: Option<ClockTime>,
    max_suggestions: Option<usize>,
    occupancy_window_start: Option<ClockTime>,
    occupancy_window_end: Option<ClockTime>,
    occupancy_slot_minutes: Option<u32>,
    utilization_slots: Option<u32>,
}

impl From<SalonSettingsRow> for SalonSettings {
    fn from(row: SalonSettingsRow) -> Self {
        let defaults = SalonSettings::default();
        Self {
            currency_symbol: row.currency_symbol.unwrap_or(defaults.currency_symbol),
            currency_code: row.currency_code.unwrap_or(defaults.currency_code),
            min_interval_minutes: row.min_interval_minutes.unwrap_or(defaults.min_interval_minutes),
            default_duration_minutes: row.default_duration_minutes.unwrap_or(defaults.default_duration_minutes),
            suggestion_window_start: row.suggestion_window_start.unwrap_or(defaults.suggestion_window_start),
            suggestion_window_end: row.suggestion_window_end.unwrap_or(defaults.suggestion_window_end),
            max_suggestions: row.max_suggestions.unwrap_or(defaults.max_suggestions),
            occupancy_window_start: row.occupancy_window_start.unwrap_or(defaults.occupancy_window_start),
            occupancy_window_end: row.occupancy_window_end.unwrap_or(defaults.occupancy_window_end),
            occupancy_slot_minutes: row.occupancy_slot_minutes.unwrap_or(defaults.occupancy_slot_minutes),
            utilization_slots: row.utilization_slots.unwrap_or(defaults.utilization_slots),
        }
    }
}

impl SalonSettings {
    /// Render an amount the way the front desk shows prices, e.g. `$1,234.50`.
    pub fn format_currency(&self, amount: f64) -> String {
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = (cents / 100).to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, self.currency_symbol, grouped, cents % 100)
    }

    /// Reject settings the availability engine cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let within_day = 1..=MINUTES_PER_DAY;
        if !within_day.contains(&self.min_interval_minutes) {
            return Err(SettingsError::Invalid("min_interval_minutes must be between 1 and 1440".to_string()));
        }
        if !within_day.contains(&self.default_duration_minutes) {
            return Err(SettingsError::Invalid("default_duration_minutes must be between 1 and 1440".to_string()));
        }
        if !within_day.contains(&self.occupancy_slot_minutes) {
            return Err(SettingsError::Invalid("occupancy_slot_minutes must be between 1 and 1440".to_string()));
        }
        if self.utilization_slots == 0 {
            return Err(SettingsError::Invalid("utilization_slots must be positive".to_string()));
        }
        if self.suggestion_window_start >= self.suggestion_window_end {
            return Err(SettingsError::Invalid("suggestion window must start before it ends".to_string()));
        }
        if self.occupancy_window_start >= self.occupancy_window_end {
            return Err(SettingsError::Invalid("occupancy window must start before it ends".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
