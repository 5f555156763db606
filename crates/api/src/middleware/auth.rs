//! # Authentication Module
//!
//! Password hashing, session token issuing and the [`AuthProfile`] extractor
//! that resolves `Authorization: Bearer <token>` to the logged-in profile.
//!
//! Passwords are hashed with Argon2 and stored in PHC string format. Session
//! tokens are random alphanumeric strings kept in the `sessions` table until
//! they expire or the user logs out.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use eyre::Result;
use rand::{distributions::Alphanumeric, Rng};
use slotbook_core::{
    errors::{BookError, BookResult},
    models::profile::{Profile, Role},
};

use crate::{middleware::error_handling::AppError, ApiState};

/// Length of a generated session token.
pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call, so hashing the same
/// password twice yields different strings.
///
/// # Example
///
/// ```
/// use slotbook_api::middleware::auth::hash_password;
///
/// let hashed = hash_password("correct horse battery").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Opaque bearer token handed out on login.
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> BookResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| BookError::Authentication("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| BookError::Authentication("Malformed Authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| BookError::Authentication("Expected a Bearer token".to_string()))?;

    Ok(token)
}

/// The profile behind the request's session token.
///
/// Handlers that take an `AuthProfile` reject anonymous requests with 401.
/// Wrap it in `Option` for endpoints that are public but show more to
/// signed-in users.
#[derive(Debug, Clone)]
pub struct AuthProfile {
    pub profile: Profile,
    pub token: String,
}

impl AuthProfile {
    pub fn require_admin(&self) -> BookResult<()> {
        if self.profile.role.is_admin() {
            Ok(())
        } else {
            Err(BookError::Authorization(
                "Administrator access required".to_string(),
            ))
        }
    }

    /// Passes for any of `roles`, and always for administrators.
    pub fn require_role(&self, roles: &[Role]) -> BookResult<()> {
        if self.profile.role.is_admin() || roles.contains(&self.profile.role) {
            Ok(())
        } else {
            Err(BookError::Authorization(format!(
                "Role '{}' may not perform this action",
                self.profile.role
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.to_string();

        let session = slotbook_db::repositories::session::get_active_session(&state.db_pool, &token)
            .await
            .map_err(BookError::Database)?
            .ok_or_else(|| BookError::Authentication("Session expired or invalid".to_string()))?;

        let db_profile =
            slotbook_db::repositories::profile::get_profile_by_id(&state.db_pool, session.profile_id)
                .await
                .map_err(BookError::Database)?
                .ok_or_else(|| BookError::Authentication("Profile no longer exists".to_string()))?;

        let profile = Profile::try_from(db_profile)?;
        tracing::debug!("Authenticated profile {} ({})", profile.id, profile.role);

        Ok(AuthProfile { profile, token })
    }
}
