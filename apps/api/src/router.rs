use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use settings_cell::{router::settings_routes, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Salon API is running!" }))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/settings", settings_routes(state))
}
