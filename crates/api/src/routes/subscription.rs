use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/subscription", get(handlers::subscription::get_subscription))
        .route("/api/subscription/trial", post(handlers::subscription::start_trial))
        .route("/api/subscription/cancel", post(handlers::subscription::cancel))
}
