use std::sync::Arc;

use tracing::{debug, warn};

use shared_database::supabase::SupabaseClient;

use crate::models::{SalonSettings, SettingsError};
use crate::services::cache::SettingsCache;

const SETTINGS_TABLE: &str = "salon_settings";

pub struct SettingsService {
    supabase: Arc<SupabaseClient>,
    cache: Arc<SettingsCache>,
}

impl SettingsService {
    pub fn new(supabase: Arc<SupabaseClient>, cache: Arc<SettingsCache>) -> Self {
        Self { supabase, cache }
    }

    /// Current settings, served from the cache while it is fresh.
    pub async fn current(&self) -> Result<SalonSettings, SettingsError> {
        if let Some(settings) = self.cache.get().await {
            return Ok(settings);
        }

        let settings = self.load().await?;
        self.cache.set(settings.clone()).await;
        Ok(settings)
    }

    /// Drop the cached copy and read the store again.
    pub async fn refresh(&self) -> Result<SalonSettings, SettingsError> {
        self.cache.invalidate().await;
        self.current().await
    }

    async fn load(&self) -> Result<SalonSettings, SettingsError> {
        debug!("Loading salon settings from store");

        let rows: Vec<SalonSettings> = self.supabase
            .select(SETTINGS_TABLE, "limit=1")
            .await
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        let Some(settings) = rows.into_iter().next() else {
            debug!("No salon settings row, using defaults");
            return Ok(SalonSettings::default());
        };

        if let Err(e) = settings.validate() {
            warn!("Stored salon settings rejected ({}), using defaults", e);
            return Ok(SalonSettings::default());
        }

        Ok(settings)
    }
}
