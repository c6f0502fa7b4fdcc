// =====================================================================================
// SETTINGS CELL - SALON SETTINGS & TTL CACHE
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;

pub use models::*;
pub use router::settings_routes;
pub use services::{SettingsCache, SettingsService};
pub use state::AppState;
