use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use std::sync::Arc;
use slotbook_core::{
    errors::BookError,
    models::{
        profile::{Profile, Role},
        shop::{
            CreateShopRequest, ReviewDecision, SetClosedRequest, Shop, ShopReviewRequest,
            ShopSearchQuery, ShopStatus, ShopStatusQuery, SlotsQuery, UpdateShopRequest,
        },
        time_slot::{format_slot, parse_date, DayOfWeek, SlotsResponse},
    },
};
use slotbook_db::repositories::shop::{NewShop, ShopChanges};
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::{auth::AuthProfile, error_handling::AppError},
    notify::Notification,
    ApiState,
};

pub(crate) async fn load_shop(state: &ApiState, id: Uuid) -> Result<Shop, AppError> {
    let db_shop = slotbook_db::repositories::shop::get_shop_by_id(&state.db_pool, id)
        .await
        .map_err(BookError::Database)?
        .ok_or_else(|| BookError::NotFound(format!("Shop with ID {} not found", id)))?;

    Ok(Shop::try_from(db_shop)?)
}

/// Loads a shop the caller is allowed to change.
pub(crate) async fn load_managed_shop(
    state: &ApiState,
    id: Uuid,
    profile: &Profile,
) -> Result<Shop, AppError> {
    let shop = load_shop(state, id).await?;
    if !shop.managed_by(profile) {
        return Err(AppError(BookError::Authorization(
            "You do not manage this shop".to_string(),
        )));
    }
    Ok(shop)
}

/// Loads a shop as the public sees it: unlisted shops only exist for their managers.
pub(crate) async fn load_visible_shop(
    state: &ApiState,
    id: Uuid,
    viewer: Option<&Profile>,
) -> Result<Shop, AppError> {
    let shop = load_shop(state, id).await?;
    let is_manager = viewer.is_some_and(|profile| shop.managed_by(profile));
    if shop.status != ShopStatus::Approved && !is_manager {
        return Err(AppError(BookError::NotFound(format!(
            "Shop with ID {} not found",
            id
        ))));
    }
    Ok(shop)
}

fn into_shops(rows: Vec<slotbook_db::models::DbShop>) -> Result<Vec<Shop>, AppError> {
    rows.into_iter()
        .map(|row| Shop::try_from(row).map_err(AppError))
        .collect()
}

#[axum::debug_handler]
pub async fn create_shop(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Json(payload): Json<CreateShopRequest>,
) -> Result<(StatusCode, Json<Shop>), AppError> {
    auth.require_role(&[Role::Owner])?;
    payload.validate()?;

    let db_shop = slotbook_db::repositories::shop::create_shop(
        &state.db_pool,
        NewShop {
            owner_id: auth.profile.id,
            name: payload.name.trim(),
            description: payload.description.as_deref(),
            address: payload.address.as_deref(),
            phone: payload.phone.as_deref(),
            timezone: payload.timezone(),
            operating_hours: &payload.operating_hours,
        },
    )
    .await
    .map_err(BookError::Database)?;

    let shop = Shop::try_from(db_shop)?;
    info!("Profile {} created shop {}", auth.profile.id, shop.id);

    Ok((StatusCode::CREATED, Json(shop)))
}

#[axum::debug_handler]
pub async fn list_public_shops(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ShopSearchQuery>,
) -> Result<Json<Vec<Shop>>, AppError> {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let rows = slotbook_db::repositories::shop::search_public_shops(&state.db_pool, search)
        .await
        .map_err(BookError::Database)?;

    Ok(Json(into_shops(rows)?))
}

#[axum::debug_handler]
pub async fn list_my_shops(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
) -> Result<Json<Vec<Shop>>, AppError> {
    let rows = slotbook_db::repositories::shop::get_shops_by_owner(&state.db_pool, auth.profile.id)
        .await
        .map_err(BookError::Database)?;

    Ok(Json(into_shops(rows)?))
}

#[axum::debug_handler]
pub async fn get_shop(
    State(state): State<Arc<ApiState>>,
    viewer: Option<AuthProfile>,
    Path(id): Path<Uuid>,
) -> Result<Json<Shop>, AppError> {
    let shop = load_visible_shop(&state, id, viewer.as_ref().map(|auth| &auth.profile)).await?;
    Ok(Json(shop))
}

#[axum::debug_handler]
pub async fn update_shop(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShopRequest>,
) -> Result<Json<Shop>, AppError> {
    payload.validate()?;
    load_managed_shop(&state, id, &auth.profile).await?;

    let db_shop = slotbook_db::repositories::shop::update_shop(
        &state.db_pool,
        id,
        ShopChanges {
            name: payload.name.as_deref().map(str::trim),
            description: payload.description.as_deref(),
            address: payload.address.as_deref(),
            phone: payload.phone.as_deref(),
            timezone: payload.timezone.as_deref(),
            operating_hours: payload.operating_hours.as_ref(),
        },
    )
    .await
    .map_err(BookError::Database)?;

    Ok(Json(Shop::try_from(db_shop)?))
}

#[axum::debug_handler]
pub async fn submit_shop(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
) -> Result<Json<Shop>, AppError> {
    let shop = load_managed_shop(&state, id, &auth.profile).await?;

    if !auth.profile.role.is_admin() && !auth.profile.subscription(Utc::now()).has_access {
        return Err(AppError(BookError::Authorization(
            "An active subscription or trial is required to submit a shop".to_string(),
        )));
    }

    let next = shop.status.submit()?;
    let db_shop = slotbook_db::repositories::shop::set_shop_status(&state.db_pool, id, next, None)
        .await
        .map_err(BookError::Database)?;

    info!("Shop {} submitted for review", id);
    Ok(Json(Shop::try_from(db_shop)?))
}

#[axum::debug_handler]
pub async fn set_closed(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetClosedRequest>,
) -> Result<Json<Shop>, AppError> {
    load_managed_shop(&state, id, &auth.profile).await?;

    let db_shop =
        slotbook_db::repositories::shop::set_manual_closed(&state.db_pool, id, payload.manual_closed)
            .await
            .map_err(BookError::Database)?;

    info!("Shop {} manual_closed={}", id, payload.manual_closed);
    Ok(Json(Shop::try_from(db_shop)?))
}

#[axum::debug_handler]
pub async fn get_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let shop = load_visible_shop(&state, id, None).await?;

    let weekday_closed = shop
        .operating_hours
        .hours_for(DayOfWeek::from(date.weekday()))
        .is_none();

    let slots = shop
        .available_slots(date, state.config.slot_step_minutes, Utc::now())
        .into_iter()
        .map(format_slot)
        .collect();

    Ok(Json(SlotsResponse {
        shop_id: shop.id,
        date,
        closed: shop.manual_closed || weekday_closed,
        slots,
    }))
}

#[axum::debug_handler]
pub async fn admin_list_shops(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Query(query): Query<ShopStatusQuery>,
) -> Result<Json<Vec<Shop>>, AppError> {
    auth.require_admin()?;

    let status = match query.status.as_deref() {
        Some(raw) => raw.parse::<ShopStatus>()?,
        None => ShopStatus::PendingReview,
    };

    let rows = slotbook_db::repositories::shop::get_shops_by_status(&state.db_pool, status)
        .await
        .map_err(BookError::Database)?;

    Ok(Json(into_shops(rows)?))
}

#[axum::debug_handler]
pub async fn review_shop(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<ShopReviewRequest>,
) -> Result<Json<Shop>, AppError> {
    auth.require_admin()?;
    let reason = payload.validated_reason()?;

    let shop = load_shop(&state, id).await?;
    let next = shop.status.review(payload.decision)?;

    let stored_reason = match payload.decision {
        ReviewDecision::Reject => reason.as_deref(),
        _ => None,
    };
    let db_shop =
        slotbook_db::repositories::shop::set_shop_status(&state.db_pool, id, next, stored_reason)
            .await
            .map_err(BookError::Database)?;
    let reviewed = Shop::try_from(db_shop)?;

    info!(
        "Admin {} moved shop {} from {} to {}",
        auth.profile.id, id, shop.status, reviewed.status
    );

    if let Some(owner) =
        slotbook_db::repositories::profile::get_profile_by_id(&state.db_pool, reviewed.owner_id)
            .await
            .map_err(BookError::Database)?
    {
        state
            .notifier
            .notify(Notification::shop_reviewed(&owner.email, &reviewed));
    }

    Ok(Json(reviewed))
}
