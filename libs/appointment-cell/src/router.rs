// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use settings_cell::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    // Read-only scheduling queries
    let availability_routes = Router::new()
        .route("/availability", get(handlers::check_availability))
        .route("/suggestions", get(handlers::get_suggestions))
        .route("/occupancy", get(handlers::get_occupancy));

    // Writes re-run the availability check before touching the store
    let booking_routes = Router::new()
        .route("/", post(handlers::create_appointment))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment).delete(handlers::delete_appointment),
        )
        .route("/{appointment_id}/reschedule", patch(handlers::reschedule_appointment))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status));

    Router::new()
        .merge(availability_routes)
        .merge(booking_routes)
        .with_state(state)
}
