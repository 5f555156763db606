use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use slotbook_core::{
    errors::BookError,
    models::{
        profile::{Profile, Role},
        subscription::{
            ensure_can_cancel, ensure_can_start_trial, trial_end, AdminSubscriptionUpdate,
            SubscriptionResponse, SubscriptionStatus,
        },
    },
};
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::{auth::AuthProfile, error_handling::AppError},
    ApiState,
};

fn summary_of(profile: &Profile) -> SubscriptionResponse {
    SubscriptionResponse {
        profile_id: profile.id,
        plan: profile.subscription_plan.clone(),
        summary: profile.subscription(Utc::now()),
    }
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_subscription(auth: AuthProfile) -> Json<SubscriptionResponse> {
    Json(summary_of(&auth.profile))
}

#[axum::debug_handler]
pub async fn start_trial(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let profile = auth.profile;
    if profile.role != Role::Owner {
        return Err(AppError(BookError::Authorization(
            "Only shop owners can start a trial".to_string(),
        )));
    }
    ensure_can_start_trial(profile.subscription_status)?;

    let trial_ends_at = trial_end(Utc::now());
    let db_profile = slotbook_db::repositories::profile::update_subscription(
        &state.db_pool,
        profile.id,
        SubscriptionStatus::Trialing,
        profile.subscription_plan.as_deref(),
        Some(trial_ends_at),
        None,
        None,
    )
    .await
    .map_err(BookError::Database)?;

    let updated = Profile::try_from(db_profile)?;
    info!("Profile {} started a trial ending {}", updated.id, trial_ends_at);

    Ok(Json(summary_of(&updated)))
}

#[axum::debug_handler]
pub async fn cancel(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let profile = auth.profile;
    ensure_can_cancel(profile.subscription_status)?;

    // Dates are kept so a paid period stays usable until it ends.
    let db_profile = slotbook_db::repositories::profile::update_subscription(
        &state.db_pool,
        profile.id,
        SubscriptionStatus::Canceled,
        profile.subscription_plan.as_deref(),
        profile.trial_ends_at,
        profile.subscription_started_at,
        profile.current_period_end,
    )
    .await
    .map_err(BookError::Database)?;

    let updated = Profile::try_from(db_profile)?;
    info!("Profile {} canceled its subscription", updated.id);

    Ok(Json(summary_of(&updated)))
}

/// Administrative sync of a profile's billing state.
#[axum::debug_handler]
pub async fn admin_update_subscription(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminSubscriptionUpdate>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    auth.require_admin()?;
    payload.validate()?;

    slotbook_db::repositories::profile::get_profile_by_id(&state.db_pool, id)
        .await
        .map_err(BookError::Database)?
        .ok_or_else(|| BookError::NotFound(format!("Profile with ID {} not found", id)))?;

    let db_profile = slotbook_db::repositories::profile::update_subscription(
        &state.db_pool,
        id,
        payload.status,
        payload.plan.as_deref(),
        payload.trial_ends_at,
        payload.subscription_started_at,
        payload.current_period_end,
    )
    .await
    .map_err(BookError::Database)?;

    let updated = Profile::try_from(db_profile)?;
    info!(
        "Admin {} set subscription of {} to {}",
        auth.profile.id, updated.id, updated.subscription_status
    );

    Ok(Json(summary_of(&updated)))
}
