use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use slotbook_core::{
    errors::BookError,
    models::catalog::{
        CreateServiceRequest, CreateStaffRequest, ServiceProvider, ShopService, ShopStaff,
        UpdateServiceRequest,
    },
};
use tracing::info;
use uuid::Uuid;

use crate::{
    handlers::shop::{load_managed_shop, load_visible_shop},
    middleware::{auth::AuthProfile, error_handling::AppError},
    ApiState,
};

/// Fetches a service, treating one from another shop as missing.
pub(crate) async fn find_service_in_shop(
    state: &ApiState,
    shop_id: Uuid,
    service_id: Uuid,
) -> Result<ShopService, AppError> {
    slotbook_db::repositories::catalog::get_service_by_id(&state.db_pool, service_id)
        .await
        .map_err(BookError::Database)?
        .filter(|service| service.shop_id == shop_id)
        .map(ShopService::from)
        .ok_or_else(|| {
            AppError(BookError::NotFound(format!(
                "Service with ID {} not found in this shop",
                service_id
            )))
        })
}

/// Fetches a staff member, treating one from another shop as missing.
pub(crate) async fn find_staff_in_shop(
    state: &ApiState,
    shop_id: Uuid,
    staff_id: Uuid,
) -> Result<ShopStaff, AppError> {
    slotbook_db::repositories::catalog::get_staff_by_id(&state.db_pool, staff_id)
        .await
        .map_err(BookError::Database)?
        .filter(|staff| staff.shop_id == shop_id)
        .map(ShopStaff::from)
        .ok_or_else(|| {
            AppError(BookError::NotFound(format!(
                "Staff member with ID {} not found in this shop",
                staff_id
            )))
        })
}

// Services

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
    viewer: Option<AuthProfile>,
    Path(shop_id): Path<Uuid>,
) -> Result<Json<Vec<ShopService>>, AppError> {
    load_visible_shop(&state, shop_id, viewer.as_ref().map(|auth| &auth.profile)).await?;

    let services = slotbook_db::repositories::catalog::get_services_by_shop(&state.db_pool, shop_id)
        .await
        .map_err(BookError::Database)?;

    Ok(Json(services.into_iter().map(ShopService::from).collect()))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(shop_id): Path<Uuid>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ShopService>), AppError> {
    payload.validate()?;
    load_managed_shop(&state, shop_id, &auth.profile).await?;

    let db_service = slotbook_db::repositories::catalog::create_service(
        &state.db_pool,
        shop_id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.price_cents,
        payload.duration_minutes,
    )
    .await
    .map_err(BookError::Database)?;

    info!("Added service {} to shop {}", db_service.id, shop_id);
    Ok((StatusCode::CREATED, Json(db_service.into())))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path((shop_id, service_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<ShopService>, AppError> {
    payload.validate()?;
    load_managed_shop(&state, shop_id, &auth.profile).await?;
    find_service_in_shop(&state, shop_id, service_id).await?;

    let db_service = slotbook_db::repositories::catalog::update_service(
        &state.db_pool,
        service_id,
        payload.name.as_deref().map(str::trim),
        payload.description.as_deref(),
        payload.price_cents,
        payload.duration_minutes,
        payload.active,
    )
    .await
    .map_err(BookError::Database)?;

    Ok(Json(db_service.into()))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path((shop_id, service_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    load_managed_shop(&state, shop_id, &auth.profile).await?;
    find_service_in_shop(&state, shop_id, service_id).await?;

    slotbook_db::repositories::catalog::delete_service(&state.db_pool, service_id)
        .await
        .map_err(BookError::Database)?;

    info!("Removed service {} from shop {}", service_id, shop_id);
    Ok(StatusCode::NO_CONTENT)
}

// Staff

#[axum::debug_handler]
pub async fn list_staff(
    State(state): State<Arc<ApiState>>,
    viewer: Option<AuthProfile>,
    Path(shop_id): Path<Uuid>,
) -> Result<Json<Vec<ShopStaff>>, AppError> {
    load_visible_shop(&state, shop_id, viewer.as_ref().map(|auth| &auth.profile)).await?;

    let staff = slotbook_db::repositories::catalog::get_staff_by_shop(&state.db_pool, shop_id)
        .await
        .map_err(BookError::Database)?;

    Ok(Json(staff.into_iter().map(ShopStaff::from).collect()))
}

#[axum::debug_handler]
pub async fn create_staff(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(shop_id): Path<Uuid>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<ShopStaff>), AppError> {
    payload.validate()?;
    load_managed_shop(&state, shop_id, &auth.profile).await?;

    if let Some(profile_id) = payload.profile_id {
        slotbook_db::repositories::profile::get_profile_by_id(&state.db_pool, profile_id)
            .await
            .map_err(BookError::Database)?
            .ok_or_else(|| {
                BookError::Validation(format!("Profile with ID {} does not exist", profile_id))
            })?;
    }

    let db_staff = slotbook_db::repositories::catalog::create_staff(
        &state.db_pool,
        shop_id,
        payload.display_name.trim(),
        payload.profile_id,
    )
    .await
    .map_err(BookError::Database)?;

    info!("Added staff member {} to shop {}", db_staff.id, shop_id);
    Ok((StatusCode::CREATED, Json(db_staff.into())))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path((shop_id, staff_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    load_managed_shop(&state, shop_id, &auth.profile).await?;
    find_staff_in_shop(&state, shop_id, staff_id).await?;

    slotbook_db::repositories::catalog::delete_staff(&state.db_pool, staff_id)
        .await
        .map_err(BookError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

// Service providers

#[axum::debug_handler]
pub async fn list_providers(
    State(state): State<Arc<ApiState>>,
    viewer: Option<AuthProfile>,
    Path((shop_id, service_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<ShopStaff>>, AppError> {
    load_visible_shop(&state, shop_id, viewer.as_ref().map(|auth| &auth.profile)).await?;
    find_service_in_shop(&state, shop_id, service_id).await?;

    let staff =
        slotbook_db::repositories::catalog::get_providers_for_service(&state.db_pool, service_id)
            .await
            .map_err(BookError::Database)?;

    Ok(Json(staff.into_iter().map(ShopStaff::from).collect()))
}

#[axum::debug_handler]
pub async fn assign_provider(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path((shop_id, service_id, staff_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<ServiceProvider>, AppError> {
    load_managed_shop(&state, shop_id, &auth.profile).await?;
    find_service_in_shop(&state, shop_id, service_id).await?;
    find_staff_in_shop(&state, shop_id, staff_id).await?;

    let assignment =
        slotbook_db::repositories::catalog::assign_provider(&state.db_pool, service_id, staff_id)
            .await
            .map_err(BookError::Database)?;

    Ok(Json(ServiceProvider {
        service_id: assignment.service_id,
        staff_id: assignment.staff_id,
    }))
}

#[axum::debug_handler]
pub async fn unassign_provider(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path((shop_id, service_id, staff_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    load_managed_shop(&state, shop_id, &auth.profile).await?;
    find_service_in_shop(&state, shop_id, service_id).await?;

    slotbook_db::repositories::catalog::unassign_provider(&state.db_pool, service_id, staff_id)
        .await
        .map_err(BookError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}
