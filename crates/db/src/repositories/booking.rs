use crate::models::DbBooking;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result};
use slotbook_core::models::booking::{BookedService, BookingStatus};
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, shop_id, customer_id, provider_id, services, appointment_date, \
     appointment_time, status, total_cents, notes, status_reason, created_at, updated_at";

pub struct NewBooking<'a> {
    pub shop_id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub services: &'a [BookedService],
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub total_cents: i64,
    pub notes: Option<&'a str>,
}

pub async fn create_booking(pool: &Pool<Postgres>, booking: NewBooking<'_>) -> Result<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating booking: id={}, shop={}, date={}, time={}",
        id, booking.shop_id, booking.appointment_date, booking.appointment_time
    );

    let created = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, shop_id, customer_id, provider_id, services, appointment_date,
                              appointment_time, status, total_cents, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(booking.shop_id)
    .bind(booking.customer_id)
    .bind(booking.provider_id)
    .bind(Json(booking.services))
    .bind(booking.appointment_date)
    .bind(booking.appointment_time)
    .bind(BookingStatus::Pending.as_str())
    .bind(booking.total_cents)
    .bind(booking.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_customer(pool: &Pool<Postgres>, customer_id: Uuid) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE customer_id = $1
        ORDER BY appointment_date DESC, appointment_time DESC
        "#
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_bookings_by_shop(
    pool: &Pool<Postgres>,
    shop_id: Uuid,
    status: Option<BookingStatus>,
    date: Option<NaiveDate>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE shop_id = $1
          AND ($2::TEXT IS NULL OR status = $2)
          AND ($3::DATE IS NULL OR appointment_date = $3)
        ORDER BY appointment_date ASC, appointment_time ASC
        "#
    ))
    .bind(shop_id)
    .bind(status.map(|s| s.as_str()))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: BookingStatus,
    reason: Option<&str>,
) -> Result<DbBooking> {
    tracing::debug!("Updating booking status: id={}, status={}", id, status);

    let updated = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, status_reason = $3, updated_at = $4
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(reason)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Booking not found"))?;

    Ok(updated)
}

/// Moves the booking to a new date and time and resets it to `status`.
pub async fn reschedule_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    appointment_date: NaiveDate,
    appointment_time: NaiveTime,
    status: BookingStatus,
) -> Result<DbBooking> {
    let updated = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET appointment_date = $2, appointment_time = $3, status = $4, status_reason = NULL,
            updated_at = $5
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(appointment_date)
    .bind(appointment_time)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Booking not found"))?;

    Ok(updated)
}
