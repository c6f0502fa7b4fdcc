use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub settings_cache_ttl_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            settings_cache_ttl_secs: 300,
        }
    }
}

impl TestConfig {
    /// Point the config at a mock store (usually `MockServer::uri()`).
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            settings_cache_ttl_secs: self.settings_cache_ttl_secs,
            port: 0,
        }
    }
}

/// Canned PostgREST rows for the salon tables.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn appointment_row(
        id: Uuid,
        date: &str,
        time: &str,
        status: &str,
        service_id: Option<Uuid>,
        price: f64,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "client_id": Uuid::new_v4(),
            "service_id": service_id,
            "date": date,
            "time": time,
            "status": status,
            "service_label": "Corte de cabello",
            "price": price,
            "notes": null,
            "reminder": false
        })
    }

    pub fn service_row(id: Uuid, name: &str, duration_minutes: u32, sale_price: f64) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "base_price": sale_price,
            "sale_price": sale_price,
            "duration_minutes": duration_minutes,
            "category_id": null,
            "uses_inventory": false
        })
    }

    pub fn settings_row(min_interval_minutes: u32) -> serde_json::Value {
        json!({
            "currency_symbol": "$",
            "currency_code": "USD",
            "min_interval_minutes": min_interval_minutes
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_service_key, "test-service-key");
        assert!(app_config.is_configured());
    }

    #[test]
    fn test_appointment_row_shape() {
        let id = Uuid::new_v4();
        let row = MockSupabaseResponses::appointment_row(id, "2024-05-01", "10:00", "PENDIENTE", None, 20.0);

        assert_eq!(row["id"], json!(id));
        assert_eq!(row["time"], "10:00");
        assert!(row["service_id"].is_null());
    }
}
