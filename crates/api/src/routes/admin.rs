use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Routes reserved for super administrators.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/profiles/:id/subscription",
            put(handlers::subscription::admin_update_subscription),
        )
        .route("/api/admin/shops", get(handlers::shop::admin_list_shops))
        .route("/api/admin/shops/:id/review", post(handlers::shop::review_shop))
}
