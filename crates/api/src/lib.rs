//! # Slotbook API
//!
//! The API crate provides the web server for the Slotbook booking service.
//! Customers find approved shops and book appointment slots; owners run their
//! shops, catalog and staff; administrators review listings and keep
//! subscriptions in sync.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Session authentication and error mapping
//! - **Notify**: Outbound booking and review notifications
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Webhook notifications
pub mod notify;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{config::ApiConfig, notify::Notifier};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slotbook_api::{config::ApiConfig, notify::Notifier, ApiState};
///
/// # async fn example(db_pool: sqlx::PgPool) {
/// let config = ApiConfig::default();
/// let notifier = Notifier::new(config.notify_webhook_url.clone());
/// let state = Arc::new(ApiState { db_pool, config, notifier });
/// let app = slotbook_api::app(state);
/// # }
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Settings the handlers read at request time (session TTL, slot step)
    pub config: ApiConfig,
    pub notifier: Notifier,
}

/// Builds the router with every endpoint and the shared state attached.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration, login and profile endpoints
        .merge(routes::auth::routes())
        // Subscription endpoints
        .merge(routes::subscription::routes())
        // Shops, catalog and slot endpoints
        .merge(routes::shop::routes())
        // Booking endpoints
        .merge(routes::booking::routes())
        // Review and billing administration
        .merge(routes::admin::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs the tracing subscriber, builds the router with CORS, request
/// tracing and timeout layers, and serves until the process stops.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> eyre::Result<()> {
/// let config = slotbook_api::config::ApiConfig::from_env()?;
/// let db_pool = slotbook_db::create_pool(&config.database_url).await?;
/// slotbook_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let notifier = Notifier::new(config.notify_webhook_url.clone());
    if !notifier.is_enabled() {
        info!("NOTIFY_WEBHOOK_URL not set, notifications are disabled");
    }

    let addr = config.server_addr();
    let request_timeout = Duration::from_secs(config.request_timeout);
    let cors_origins = config.cors_origins.clone();

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        config,
        notifier,
    });

    let router = app(state);

    // Apply CORS configuration if origins are specified
    let router = match &cors_origins {
        Some(origins) => router.layer(cors_layer(origins)?),
        None => router,
    };

    let router = router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout)),
    );

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
