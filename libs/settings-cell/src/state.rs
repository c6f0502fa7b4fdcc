use std::sync::Arc;
use std::time::Duration;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::services::{SettingsCache, SettingsService};

/// Application context shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub supabase: Arc<SupabaseClient>,
    pub settings_cache: Arc<SettingsCache>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(&config));
        let settings_cache = Arc::new(SettingsCache::new(Duration::from_secs(config.settings_cache_ttl_secs)));

        Self {
            config: Arc::new(config),
            supabase,
            settings_cache,
        }
    }

    pub fn settings_service(&self) -> SettingsService {
        SettingsService::new(self.supabase.clone(), self.settings_cache.clone())
    }
}
