use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::SalonSettings;

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub cached: bool,
    pub age_secs: Option<u64>,
    pub ttl_secs: u64,
}

struct CachedSettings {
    settings: SalonSettings,
    stored_at: Instant,
}

/// Time-bounded holder for the salon settings.
///
/// One instance lives in `AppState` for the lifetime of the server; entries
/// older than the TTL are treated as absent.
pub struct SettingsCache {
    ttl: Duration,
    entry: RwLock<Option<CachedSettings>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SettingsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self) -> Option<SalonSettings> {
        let entry = self.entry.read().await;
        match entry.as_ref() {
            Some(cached) if cached.stored_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(cached.settings.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn set(&self, settings: SalonSettings) {
        debug!("Caching salon settings for {:?}", self.ttl);
        *self.entry.write().await = Some(CachedSettings {
            settings,
            stored_at: Instant::now(),
        });
    }

    pub async fn invalidate(&self) {
        debug!("Invalidating cached salon settings");
        *self.entry.write().await = None;
    }

    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        let entry = self.entry.read().await;
        let age = entry.as_ref().map(|cached| cached.stored_at.elapsed());

        CacheStats {
            hits,
            misses,
            hit_rate: if lookups == 0 { 0.0 } else { hits as f64 / lookups as f64 },
            cached: age.is_some_and(|age| age < self.ttl),
            age_secs: age.map(|age| age.as_secs()),
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
