use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn settings_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_settings))
        .route("/cache", get(handlers::get_cache_stats))
        .route("/cache/invalidate", post(handlers::invalidate_cache))
        .with_state(state)
}
