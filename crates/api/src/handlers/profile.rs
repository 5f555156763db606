use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;
use slotbook_core::{
    errors::BookError,
    models::profile::{
        normalize_email, LoginRequest, LoginResponse, Profile, ProfileResponse, RegisterRequest,
        UpdateProfileRequest,
    },
};
use tracing::info;

use crate::{
    middleware::{
        auth::{self, AuthProfile},
        error_handling::AppError,
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    payload.validate()?;
    let email = payload.normalized_email();

    let existing = slotbook_db::repositories::profile::get_profile_by_email(&state.db_pool, &email)
        .await
        .map_err(BookError::Database)?;
    if existing.is_some() {
        return Err(AppError(BookError::Validation(
            "An account with this email already exists".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let db_profile = slotbook_db::repositories::profile::create_profile(
        &state.db_pool,
        &email,
        &password_hash,
        payload.full_name.trim(),
        payload.role,
        payload.business_name.as_deref(),
    )
    .await
    .map_err(|err| {
        if slotbook_db::repositories::profile::is_unique_violation(&err) {
            BookError::Validation("An account with this email already exists".to_string())
        } else {
            BookError::Database(err)
        }
    })?;

    let profile = Profile::try_from(db_profile)?;
    info!("Registered {} profile {}", profile.role, profile.id);

    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&payload.email);

    let db_profile = slotbook_db::repositories::profile::verify_credentials(
        &state.db_pool,
        &email,
        &payload.password,
    )
    .await
    .map_err(BookError::Database)?
    .ok_or_else(|| BookError::Authentication("Invalid email or password".to_string()))?;

    let profile = Profile::try_from(db_profile)?;

    let token = auth::generate_session_token();
    let expires_at = Utc::now() + Duration::hours(state.config.session_ttl_hours);
    slotbook_db::repositories::session::create_session(&state.db_pool, &token, profile.id, expires_at)
        .await
        .map_err(BookError::Database)?;

    info!("Profile {} logged in", profile.id);

    Ok(Json(LoginResponse {
        token,
        expires_at,
        profile: profile.into(),
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
) -> Result<StatusCode, AppError> {
    slotbook_db::repositories::session::delete_session(&state.db_pool, &auth.token)
        .await
        .map_err(BookError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_me(auth: AuthProfile) -> Json<ProfileResponse> {
    Json(auth.profile.into())
}

#[axum::debug_handler]
pub async fn update_me(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    payload.validate()?;

    let db_profile = slotbook_db::repositories::profile::update_profile(
        &state.db_pool,
        auth.profile.id,
        payload.full_name.as_deref().map(str::trim),
        payload.business_name.as_deref(),
    )
    .await
    .map_err(BookError::Database)?;

    let profile = Profile::try_from(db_profile)?;
    Ok(Json(profile.into()))
}
