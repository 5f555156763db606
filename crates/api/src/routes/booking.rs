use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/mine", get(handlers::booking::list_my_bookings))
        .route("/api/bookings/:id", get(handlers::booking::get_booking))
        .route(
            "/api/bookings/:id/status",
            put(handlers::booking::update_booking_status),
        )
        .route(
            "/api/bookings/:id/reschedule",
            put(handlers::booking::reschedule_booking),
        )
}
