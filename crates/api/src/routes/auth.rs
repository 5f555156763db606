use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/register", post(handlers::profile::register))
        .route("/api/auth/login", post(handlers::profile::login))
        .route("/api/auth/logout", post(handlers::profile::logout))
        .route(
            "/api/profiles/me",
            get(handlers::profile::get_me).put(handlers::profile::update_me),
        )
}
