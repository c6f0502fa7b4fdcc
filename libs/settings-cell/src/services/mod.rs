pub mod cache;
pub mod settings;

pub use cache::{CacheStats, SettingsCache};
pub use settings::SettingsService;
