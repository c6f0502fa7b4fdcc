use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::SettingsError;
use crate::state::AppState;

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::Invalid(msg) => AppError::ValidationError(msg),
            SettingsError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings_service().current().await?;

    Ok(Json(json!({
        "settings": settings,
        "example_price": settings.format_currency(1234.5)
    })))
}

#[axum::debug_handler]
pub async fn get_cache_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let stats = state.settings_cache.stats().await;
    Ok(Json(json!(stats)))
}

#[axum::debug_handler]
pub async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.settings_cache.invalidate().await;

    Ok(Json(json!({
        "success": true,
        "message": "Settings cache invalidated"
    })))
}
