pub mod availability;
pub mod booking;
pub mod conflict;
pub mod occupancy;
pub mod suggestion;
pub mod timeline;

pub use availability::AvailabilityService;
pub use booking::AppointmentBookingService;
pub use conflict::{AvailabilityOutcome, ConflictDetectionService};
pub use occupancy::OccupancyReporter;
pub use suggestion::SlotSuggester;
pub use timeline::{DurationTable, Interval, ScheduledAppointment};
