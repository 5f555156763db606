use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/shops",
            get(handlers::shop::list_public_shops).post(handlers::shop::create_shop),
        )
        .route("/api/shops/mine", get(handlers::shop::list_my_shops))
        .route(
            "/api/shops/:id",
            get(handlers::shop::get_shop).put(handlers::shop::update_shop),
        )
        .route("/api/shops/:id/submit", post(handlers::shop::submit_shop))
        .route("/api/shops/:id/closed", put(handlers::shop::set_closed))
        .route("/api/shops/:id/slots", get(handlers::shop::get_slots))
        .route(
            "/api/shops/:id/bookings",
            get(handlers::booking::list_shop_bookings),
        )
        // Catalog
        .route(
            "/api/shops/:id/services",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/api/shops/:id/services/:service_id",
            put(handlers::catalog::update_service).delete(handlers::catalog::delete_service),
        )
        .route(
            "/api/shops/:id/staff",
            get(handlers::catalog::list_staff).post(handlers::catalog::create_staff),
        )
        .route(
            "/api/shops/:id/staff/:staff_id",
            delete(handlers::catalog::delete_staff),
        )
        .route(
            "/api/shops/:id/services/:service_id/providers",
            get(handlers::catalog::list_providers),
        )
        .route(
            "/api/shops/:id/services/:service_id/providers/:staff_id",
            post(handlers::catalog::assign_provider).delete(handlers::catalog::unassign_provider),
        )
}
