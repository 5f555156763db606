//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotbook_core::errors::BookError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotbook_api::middleware::error_handling::AppError;
/// use slotbook_core::errors::BookError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(BookError::NotFound("Shop not found".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookError::NotFound(_) => StatusCode::NOT_FOUND,
            BookError::Validation(_) => StatusCode::BAD_REQUEST,
            BookError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookError::Authorization(_) => StatusCode::FORBIDDEN,
            BookError::Conflict(_) => StatusCode::CONFLICT,
            BookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full; the client only sees the message.
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        AppError(err)
    }
}

/// Repository failures arrive as `eyre::Report` and become database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookError::Database(err))
    }
}

pub fn map_error(err: BookError) -> Response {
    AppError(err).into_response()
}
