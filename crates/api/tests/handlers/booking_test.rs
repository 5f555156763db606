use chrono::{NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use slotbook_api::middleware::error_handling::AppError;
use slotbook_core::{
    errors::BookError,
    models::{
        booking::{
            select_services, total_cents, BookedService, Booking, BookingActor, BookingStatus,
            CreateBookingRequest, UpdateBookingStatusRequest,
        },
        catalog::{ShopService, ShopStaff},
        profile::{Profile, Role},
        shop::{Shop, ShopStatus},
    },
};
use slotbook_db::models::{DbBooking, DbShop};
use uuid::Uuid;

use crate::test_utils::{db_booking, db_profile, db_service, db_shop, db_staff, TestContext};

async fn staff_ids_with_mocks(
    ctx: &TestContext,
    shop: &Shop,
    caller: &Profile,
) -> Result<Vec<Uuid>, AppError> {
    let rows = ctx
        .catalog_repo
        .get_staff_for_profile(shop.id, caller.id)
        .await?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}

// Mirrors handlers::booking::load_booking_for with the repositories mocked.
async fn load_booking_with_mocks(
    ctx: &TestContext,
    caller: &Profile,
    id: Uuid,
) -> Result<(Booking, BookingActor), AppError> {
    let booking = ctx
        .booking_repo
        .get_booking_by_id(id)
        .await?
        .ok_or_else(|| BookError::NotFound(format!("Booking with ID {} not found", id)))?;
    let booking = Booking::try_from(booking)?;

    let shop = ctx
        .shop_repo
        .get_shop_by_id(booking.shop_id)
        .await?
        .ok_or_else(|| BookError::NotFound("Shop not found".to_string()))?;
    let shop = Shop::try_from(shop)?;

    let staff_ids = staff_ids_with_mocks(ctx, &shop, caller).await?;
    let actor = BookingActor::resolve(caller, &shop, &booking, &staff_ids)
        .ok_or_else(|| BookError::Authorization("You are not a party to this booking".to_string()))?;

    Ok((booking, actor))
}

// Mirrors handlers::booking::update_booking_status with the repositories mocked.
async fn update_status_with_mocks(
    ctx: &TestContext,
    caller: &Profile,
    id: Uuid,
    request: UpdateBookingStatusRequest,
) -> Result<Booking, AppError> {
    let reason = request.validated_reason()?;
    let (booking, actor) = load_booking_with_mocks(ctx, caller, id).await?;

    if !actor.may_set(request.status) {
        return Err(AppError(BookError::Authorization(
            "Customers can only cancel their bookings".to_string(),
        )));
    }
    let next = booking.status.transition(request.status)?;

    let updated = ctx
        .booking_repo
        .update_booking_status(id, next, reason)
        .await?;
    Ok(Booking::try_from(updated)?)
}

struct Fixture {
    ctx: TestContext,
    owner: Profile,
    customer: Profile,
    booking: DbBooking,
}

fn fixture(status: BookingStatus) -> Fixture {
    fixture_with_provider(status, None)
}

fn fixture_with_provider(status: BookingStatus, provider_id: Option<Uuid>) -> Fixture {
    let owner = db_profile(Role::Owner);
    let customer = db_profile(Role::Customer);
    let shop = db_shop(owner.id, ShopStatus::Approved);
    let mut booking = db_booking(shop.id, customer.id, status);
    booking.provider_id = provider_id;

    let mut ctx = TestContext::new();

    let booking_row = booking.clone();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .with(predicate::eq(booking.id))
        .returning(move |_| Ok(Some(booking_row.clone())));

    let shop_row = shop.clone();
    ctx.shop_repo
        .expect_get_shop_by_id()
        .with(predicate::eq(shop.id))
        .returning(move |_| Ok(Some(shop_row.clone())));

    Fixture {
        ctx,
        owner: Profile::try_from(owner).unwrap(),
        customer: Profile::try_from(customer).unwrap(),
        booking,
    }
}

fn expect_not_staff(ctx: &mut TestContext) {
    ctx.catalog_repo
        .expect_get_staff_for_profile()
        .returning(|_, _| Ok(vec![]));
}

fn expect_update(ctx: &mut TestContext, row: &DbBooking, status: BookingStatus, reason: Option<&str>) {
    let mut updated = row.clone();
    updated.status = status.as_str().to_string();
    updated.status_reason = reason.map(str::to_string);

    ctx.booking_repo
        .expect_update_booking_status()
        .with(
            predicate::eq(row.id),
            predicate::eq(status),
            predicate::eq(reason.map(str::to_string)),
        )
        .times(1)
        .returning(move |_, _, _| Ok(updated.clone()));
}

#[tokio::test]
async fn test_customer_cancels_pending_booking() {
    let mut f = fixture(BookingStatus::Pending);
    expect_not_staff(&mut f.ctx);
    expect_update(&mut f.ctx, &f.booking, BookingStatus::Cancelled, None);

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Cancelled,
        reason: None,
    };
    let updated = update_status_with_mocks(&f.ctx, &f.customer, f.booking.id, request)
        .await
        .unwrap();

    assert_eq!(updated.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_customer_cannot_approve() {
    let mut f = fixture(BookingStatus::Pending);
    expect_not_staff(&mut f.ctx);

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Approved,
        reason: None,
    };
    let result = update_status_with_mocks(&f.ctx, &f.customer, f.booking.id, request).await;

    assert!(matches!(result, Err(AppError(BookError::Authorization(_)))));
}

#[tokio::test]
async fn test_owner_rejects_with_reason() {
    let mut f = fixture(BookingStatus::Pending);
    expect_not_staff(&mut f.ctx);
    expect_update(
        &mut f.ctx,
        &f.booking,
        BookingStatus::Rejected,
        Some("Closed for a holiday"),
    );

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Rejected,
        reason: Some("  Closed for a holiday ".to_string()),
    };
    let updated = update_status_with_mocks(&f.ctx, &f.owner, f.booking.id, request)
        .await
        .unwrap();

    assert_eq!(updated.status, BookingStatus::Rejected);
    assert_eq!(updated.status_reason.as_deref(), Some("Closed for a holiday"));
}

#[tokio::test]
async fn test_reject_without_reason_never_loads_booking() {
    // No expectations: any repository call would panic.
    let ctx = TestContext::new();
    let owner = Profile::try_from(db_profile(Role::Owner)).unwrap();

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Rejected,
        reason: None,
    };
    let result = update_status_with_mocks(&ctx, &owner, Uuid::new_v4(), request).await;

    assert!(matches!(result, Err(AppError(BookError::Validation(_)))));
}

#[tokio::test]
async fn test_completed_booking_cannot_be_cancelled() {
    let mut f = fixture(BookingStatus::Completed);
    expect_not_staff(&mut f.ctx);

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Cancelled,
        reason: None,
    };
    let result = update_status_with_mocks(&f.ctx, &f.owner, f.booking.id, request).await;

    assert!(matches!(result, Err(AppError(BookError::Conflict(_)))));
}

#[tokio::test]
async fn test_assigned_provider_can_approve() {
    let provider = Profile::try_from(db_profile(Role::Provider)).unwrap();
    let staff_id = Uuid::new_v4();
    let mut f = fixture_with_provider(BookingStatus::Pending, Some(staff_id));
    let mut staff_row = db_staff(f.booking.shop_id, Some(provider.id));
    staff_row.id = staff_id;

    f.ctx
        .catalog_repo
        .expect_get_staff_for_profile()
        .with(predicate::eq(f.booking.shop_id), predicate::eq(provider.id))
        .returning(move |_, _| Ok(vec![staff_row.clone()]));
    expect_update(&mut f.ctx, &f.booking, BookingStatus::Approved, None);

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Approved,
        reason: None,
    };
    let updated = update_status_with_mocks(&f.ctx, &provider, f.booking.id, request)
        .await
        .unwrap();

    assert_eq!(updated.status, BookingStatus::Approved);
}

#[tokio::test]
async fn test_unrelated_profile_is_refused() {
    let mut f = fixture(BookingStatus::Pending);
    expect_not_staff(&mut f.ctx);
    let stranger = Profile::try_from(db_profile(Role::Customer)).unwrap();

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Cancelled,
        reason: None,
    };
    let result = update_status_with_mocks(&f.ctx, &stranger, f.booking.id, request).await;

    assert!(matches!(result, Err(AppError(BookError::Authorization(_)))));
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(|_| Ok(None));
    let customer = Profile::try_from(db_profile(Role::Customer)).unwrap();

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Cancelled,
        reason: None,
    };
    let result = update_status_with_mocks(&ctx, &customer, Uuid::new_v4(), request).await;

    assert!(matches!(result, Err(AppError(BookError::NotFound(_)))));
}

#[tokio::test]
async fn test_unassigned_staff_cannot_view_booking() {
    let mut f = fixture_with_provider(BookingStatus::Pending, Some(Uuid::new_v4()));
    let colleague = Profile::try_from(db_profile(Role::Provider)).unwrap();
    let staff_row = db_staff(f.booking.shop_id, Some(colleague.id));

    f.ctx
        .catalog_repo
        .expect_get_staff_for_profile()
        .returning(move |_, _| Ok(vec![staff_row.clone()]));

    let result = load_booking_with_mocks(&f.ctx, &colleague, f.booking.id).await;

    assert!(matches!(result, Err(AppError(BookError::Authorization(_)))));
}

#[tokio::test]
async fn test_unassigned_staff_cannot_approve() {
    let mut f = fixture(BookingStatus::Pending);
    let colleague = Profile::try_from(db_profile(Role::Provider)).unwrap();
    let staff_row = db_staff(f.booking.shop_id, Some(colleague.id));

    f.ctx
        .catalog_repo
        .expect_get_staff_for_profile()
        .returning(move |_, _| Ok(vec![staff_row.clone()]));

    let request = UpdateBookingStatusRequest {
        status: BookingStatus::Approved,
        reason: None,
    };
    let result = update_status_with_mocks(&f.ctx, &colleague, f.booking.id, request).await;

    assert!(matches!(result, Err(AppError(BookError::Authorization(_)))));
}

#[tokio::test]
async fn test_staff_booking_at_own_shop_acts_as_customer() {
    let staff_id = Uuid::new_v4();
    let mut f = fixture_with_provider(BookingStatus::Pending, Some(staff_id));
    let mut staff_row = db_staff(f.booking.shop_id, Some(f.customer.id));
    staff_row.id = staff_id;

    f.ctx
        .catalog_repo
        .expect_get_staff_for_profile()
        .returning(move |_, _| Ok(vec![staff_row.clone()]));

    let (_, actor) = load_booking_with_mocks(&f.ctx, &f.customer, f.booking.id)
        .await
        .unwrap();

    assert_eq!(actor, BookingActor::Customer);
    assert!(actor.may_reschedule());
}

// Mirrors handlers::booking::create_booking up to the insert, with the
// repositories mocked.
async fn create_with_mocks(
    ctx: &TestContext,
    payload: CreateBookingRequest,
) -> Result<(Vec<BookedService>, i64), AppError> {
    payload.validate()?;

    let shop = ctx
        .shop_repo
        .get_shop_by_id(payload.shop_id)
        .await?
        .ok_or_else(|| BookError::NotFound("Shop not found".to_string()))?;
    let shop = Shop::try_from(shop)?;
    if !shop.is_bookable() {
        return Err(AppError(BookError::Conflict(format!(
            "{} is not accepting bookings",
            shop.name
        ))));
    }

    let catalog: Vec<ShopService> = ctx
        .catalog_repo
        .get_services_by_shop(shop.id)
        .await?
        .into_iter()
        .map(ShopService::from)
        .collect();
    let services = select_services(&payload.service_ids, &catalog)?;

    if let Some(provider_id) = payload.provider_id {
        let staff = ctx
            .catalog_repo
            .get_staff_by_id(provider_id)
            .await?
            .filter(|staff| staff.shop_id == shop.id)
            .map(ShopStaff::from)
            .ok_or_else(|| {
                BookError::NotFound(format!(
                    "Staff member with ID {} not found in this shop",
                    provider_id
                ))
            })?;
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
        30,
        Utc::now(),
    )?;

    let total = total_cents(&services);
    Ok((services, total))
}

struct CreateFixture {
    ctx: TestContext,
    shop: DbShop,
    service_id: Uuid,
}

fn create_fixture(shop: DbShop) -> CreateFixture {
    let service = db_service(shop.id);
    let service_id = service.id;
    let mut ctx = TestContext::new();

    let shop_row = shop.clone();
    ctx.shop_repo
        .expect_get_shop_by_id()
        .with(predicate::eq(shop.id))
        .returning(move |_| Ok(Some(shop_row.clone())));
    ctx.catalog_repo
        .expect_get_services_by_shop()
        .returning(move |_| Ok(vec![service.clone()]));

    CreateFixture {
        ctx,
        shop,
        service_id,
    }
}

fn create_request(f: &CreateFixture, provider_id: Option<Uuid>) -> CreateBookingRequest {
    CreateBookingRequest {
        shop_id: f.shop.id,
        service_ids: vec![f.service_id],
        provider_id,
        // A Monday inside the default hours.
        appointment_date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
        appointment_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_booking_snapshots_services() {
    let f = create_fixture(db_shop(Uuid::new_v4(), ShopStatus::Approved));

    let (services, total) = create_with_mocks(&f.ctx, create_request(&f, None))
        .await
        .unwrap();

    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_id, f.service_id);
    assert_eq!(services[0].name, "Haircut");
    assert_eq!(total, 2500);
}

#[tokio::test]
async fn test_create_booking_with_active_provider() {
    let mut f = create_fixture(db_shop(Uuid::new_v4(), ShopStatus::Approved));
    let staff_row = db_staff(f.shop.id, None);
    let staff_id = staff_row.id;
    f.ctx
        .catalog_repo
        .expect_get_staff_by_id()
        .with(predicate::eq(staff_id))
        .returning(move |_| Ok(Some(staff_row.clone())));

    let request = create_request(&f, Some(staff_id));
    let (_, total) = create_with_mocks(&f.ctx, request).await.unwrap();

    assert_eq!(total, 2500);
}

#[tokio::test]
async fn test_create_booking_rejects_provider_from_other_shop() {
    let mut f = create_fixture(db_shop(Uuid::new_v4(), ShopStatus::Approved));
    let elsewhere = db_staff(Uuid::new_v4(), None);
    let staff_id = elsewhere.id;
    f.ctx
        .catalog_repo
        .expect_get_staff_by_id()
        .returning(move |_| Ok(Some(elsewhere.clone())));

    let result = create_with_mocks(&f.ctx, create_request(&f, Some(staff_id))).await;

    assert!(matches!(result, Err(AppError(BookError::NotFound(_)))));
}

#[tokio::test]
async fn test_create_booking_rejects_inactive_provider() {
    let mut f = create_fixture(db_shop(Uuid::new_v4(), ShopStatus::Approved));
    let mut staff_row = db_staff(f.shop.id, None);
    staff_row.active = false;
    let staff_id = staff_row.id;
    f.ctx
        .catalog_repo
        .expect_get_staff_by_id()
        .returning(move |_| Ok(Some(staff_row.clone())));

    let result = create_with_mocks(&f.ctx, create_request(&f, Some(staff_id))).await;

    assert!(matches!(
        result,
        Err(AppError(BookError::Validation(ref message))) if message == "Sam is not taking bookings"
    ));
}

#[tokio::test]
async fn test_create_booking_rejects_closed_shop() {
    let mut shop = db_shop(Uuid::new_v4(), ShopStatus::Approved);
    shop.manual_closed = true;
    let f = create_fixture(shop);

    let result = create_with_mocks(&f.ctx, create_request(&f, None)).await;

    assert!(matches!(result, Err(AppError(BookError::Conflict(_)))));
}

#[tokio::test]
async fn test_create_booking_rejects_unapproved_shop() {
    let f = create_fixture(db_shop(Uuid::new_v4(), ShopStatus::PendingReview));

    let result = create_with_mocks(&f.ctx, create_request(&f, None)).await;

    assert!(matches!(result, Err(AppError(BookError::Conflict(_)))));
}

#[tokio::test]
async fn test_create_booking_rejects_slot_outside_hours() {
    let f = create_fixture(db_shop(Uuid::new_v4(), ShopStatus::Approved));
    let mut request = create_request(&f, None);
    request.appointment_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

    let result = create_with_mocks(&f.ctx, request).await;

    assert!(matches!(result, Err(AppError(BookError::Validation(_)))));
}
