use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use slotbook_core::{
    errors::BookError,
    models::{
        booking::{
            select_services, total_cents, Booking, BookingActor, BookingListQuery,
            CreateBookingRequest, RescheduleBookingRequest, UpdateBookingStatusRequest,
        },
        catalog::ShopService,
        profile::Profile,
        shop::Shop,
    },
};
use slotbook_db::repositories::booking::NewBooking;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    handlers::{catalog::find_staff_in_shop, shop::load_shop},
    middleware::{auth::AuthProfile, error_handling::AppError},
    notify::Notification,
    ApiState,
};

fn into_bookings(rows: Vec<slotbook_db::models::DbBooking>) -> Result<Vec<Booking>, AppError> {
    rows.into_iter()
        .map(|row| Booking::try_from(row).map_err(AppError))
        .collect()
}

/// Ids of the staff rows of `shop` linked to `profile`.
async fn staff_ids_of(state: &ApiState, shop: &Shop, profile: &Profile) -> Result<Vec<Uuid>, AppError> {
    let rows =
        slotbook_db::repositories::catalog::get_staff_for_profile(&state.db_pool, shop.id, profile.id)
            .await
            .map_err(BookError::Database)?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}

/// Loads a booking together with its shop and the caller's relation to it.
async fn load_booking_for(
    state: &ApiState,
    id: Uuid,
    profile: &Profile,
) -> Result<(Booking, Shop, BookingActor), AppError> {
    let db_booking = slotbook_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(BookError::Database)?
        .ok_or_else(|| BookError::NotFound(format!("Booking with ID {} not found", id)))?;
    let booking = Booking::try_from(db_booking)?;
    let shop = load_shop(state, booking.shop_id).await?;

    let staff_ids = staff_ids_of(state, &shop, profile).await?;
    let actor = BookingActor::resolve(profile, &shop, &booking, &staff_ids).ok_or_else(|| {
        BookError::Authorization("You are not a party to this booking".to_string())
    })?;

    Ok((booking, shop, actor))
}

async fn email_of(state: &ApiState, profile_id: Uuid) -> Result<Option<String>, AppError> {
    let profile = slotbook_db::repositories::profile::get_profile_by_id(&state.db_pool, profile_id)
        .await
        .map_err(BookError::Database)?;
    Ok(profile.map(|p| p.email))
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    payload.validate()?;

    let shop = load_shop(&state, payload.shop_id).await?;
    if !shop.is_bookable() {
        return Err(AppError(BookError::Conflict(format!(
            "{} is not accepting bookings",
            shop.name
        ))));
    }

    let catalog: Vec<ShopService> =
        slotbook_db::repositories::catalog::get_services_by_shop(&state.db_pool, shop.id)
            .await
            .map_err(BookError::Database)?
            .into_iter()
            .map(ShopService::from)
            .collect();
    let services = select_services(&payload.service_ids, &catalog)?;

    if let Some(provider_id) = payload.provider_id {
        let staff = find_staff_in_shop(&state, shop.id, provider_id).await?;
        if !staff.active {
            return Err(AppError(BookError::Validation(format!(
                "{} is not taking bookings",
                staff.display_name
            ))));
        }
    }

    shop.ensure_slot_available(
        payload.appointment_date,
        payload.appointment_time,
        state.config.slot_step_minutes,
        Utc::now(),
    )?;

    let db_booking = slotbook_db::repositories::booking::create_booking(
        &state.db_pool,
        NewBooking {
            shop_id: shop.id,
            customer_id: auth.profile.id,
            provider_id: payload.provider_id,
            services: &services,
            appointment_date: payload.appointment_date,
            appointment_time: payload.appointment_time,
            total_cents: total_cents(&services),
            notes: payload.notes.as_deref(),
        },
    )
    .await
    .map_err(BookError::Database)?;

    let booking = Booking::try_from(db_booking)?;
    info!(
        "Booking {} created at shop {} for {} {}",
        booking.id, shop.id, booking.appointment_date, booking.appointment_time
    );

    if let Some(owner_email) = email_of(&state, shop.owner_id).await? {
        state
            .notifier
            .notify(Notification::booking_created(&owner_email, &shop, &booking));
    }

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn list_my_bookings(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
) -> Result<Json<Vec<Booking>>, AppError> {
    let rows =
        slotbook_db::repositories::booking::get_bookings_by_customer(&state.db_pool, auth.profile.id)
            .await
            .map_err(BookError::Database)?;

    Ok(Json(into_bookings(rows)?))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let (booking, _, actor) = load_booking_for(&state, id, &auth.profile).await?;
    debug!("Booking {} read by {:?}", id, actor);

    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn list_shop_bookings(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(shop_id): Path<Uuid>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let (status, date) = query.parsed()?;
    let shop = load_shop(&state, shop_id).await?;

    if !shop.managed_by(&auth.profile)
        && staff_ids_of(&state, &shop, &auth.profile).await?.is_empty()
    {
        return Err(AppError(BookError::Authorization(
            "Only the shop's managers and providers can list its bookings".to_string(),
        )));
    }

    let rows =
        slotbook_db::repositories::booking::get_bookings_by_shop(&state.db_pool, shop_id, status, date)
            .await
            .map_err(BookError::Database)?;

    Ok(Json(into_bookings(rows)?))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let reason = payload.validated_reason()?;
    let (booking, shop, actor) = load_booking_for(&state, id, &auth.profile).await?;

    if !actor.may_set(payload.status) {
        return Err(AppError(BookError::Authorization(
            "Customers can only cancel their bookings".to_string(),
        )));
    }
    let next = booking.status.transition(payload.status)?;

    let db_booking = slotbook_db::repositories::booking::update_booking_status(
        &state.db_pool,
        id,
        next,
        reason.as_deref(),
    )
    .await
    .map_err(BookError::Database)?;
    let updated = Booking::try_from(db_booking)?;

    info!(
        "Booking {} moved from {} to {} by {:?}",
        id, booking.status, updated.status, actor
    );

    // The other side of the booking hears about it.
    let recipient_id = match actor {
        BookingActor::Customer => shop.owner_id,
        _ => updated.customer_id,
    };
    if let Some(email) = email_of(&state, recipient_id).await? {
        state
            .notifier
            .notify(Notification::booking_status_changed(&email, &shop, &updated));
    }

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn reschedule_booking(
    State(state): State<Arc<ApiState>>,
    auth: AuthProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let (booking, shop, actor) = load_booking_for(&state, id, &auth.profile).await?;

    if !actor.may_reschedule() {
        return Err(AppError(BookError::Authorization(
            "Providers cannot reschedule bookings".to_string(),
        )));
    }
    let next = booking.status.reschedule()?;

    shop.ensure_slot_available(
        payload.appointment_date,
        payload.appointment_time,
        state.config.slot_step_minutes,
        Utc::now(),
    )?;

    let db_booking = slotbook_db::repositories::booking::reschedule_booking(
        &state.db_pool,
        id,
        payload.appointment_date,
        payload.appointment_time,
        next,
    )
    .await
    .map_err(BookError::Database)?;
    let updated = Booking::try_from(db_booking)?;

    info!(
        "Booking {} rescheduled to {} {}",
        id, updated.appointment_date, updated.appointment_time
    );

    let recipient_id = match actor {
        BookingActor::Customer => shop.owner_id,
        _ => updated.customer_id,
    };
    if let Some(email) = email_of(&state, recipient_id).await? {
        state
            .notifier
            .notify(Notification::booking_rescheduled(&email, &shop, &updated));
    }

    Ok(Json(updated))
}
