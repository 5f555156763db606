use crate::models::{DbServiceProvider, DbShopService, DbShopStaff};
use chrono::Utc;
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Service Repository

pub async fn create_service(
    pool: &Pool<Postgres>,
    shop_id: Uuid,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    duration_minutes: i32,
) -> Result<DbShopService> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let service = sqlx::query_as::<_, DbShopService>(
        r#"
        INSERT INTO shop_services (id, shop_id, name, description, price_cents, duration_minutes,
                                   active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
        RETURNING id, shop_id, name, description, price_cents, duration_minutes, active, created_at
        "#,
    )
    .bind(id)
    .bind(shop_id)
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(duration_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbShopService>> {
    let service = sqlx::query_as::<_, DbShopService>(
        r#"
        SELECT id, shop_id, name, description, price_cents, duration_minutes, active, created_at
        FROM shop_services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn get_services_by_shop(pool: &Pool<Postgres>, shop_id: Uuid) -> Result<Vec<DbShopService>> {
    let services = sqlx::query_as::<_, DbShopService>(
        r#"
        SELECT id, shop_id, name, description, price_cents, duration_minutes, active, created_at
        FROM shop_services
        WHERE shop_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn update_service(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    price_cents: Option<i64>,
    duration_minutes: Option<i32>,
    active: Option<bool>,
) -> Result<DbShopService> {
    let service = get_service_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Service not found"))?;

    let updated = sqlx::query_as::<_, DbShopService>(
        r#"
        UPDATE shop_services
        SET name = $2, description = $3, price_cents = $4, duration_minutes = $5, active = $6
        WHERE id = $1
        RETURNING id, shop_id, name, description, price_cents, duration_minutes, active, created_at
        "#,
    )
    .bind(id)
    .bind(name.unwrap_or(&service.name))
    .bind(description.or(service.description.as_deref()))
    .bind(price_cents.unwrap_or(service.price_cents))
    .bind(duration_minutes.unwrap_or(service.duration_minutes))
    .bind(active.unwrap_or(service.active))
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_service(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM shop_services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

// Staff Repository

pub async fn create_staff(
    pool: &Pool<Postgres>,
    shop_id: Uuid,
    display_name: &str,
    profile_id: Option<Uuid>,
) -> Result<DbShopStaff> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let staff = sqlx::query_as::<_, DbShopStaff>(
        r#"
        INSERT INTO shop_staff (id, shop_id, profile_id, display_name, active, created_at)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        RETURNING id, shop_id, profile_id, display_name, active, created_at
        "#,
    )
    .bind(id)
    .bind(shop_id)
    .bind(profile_id)
    .bind(display_name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(staff)
}

pub async fn get_staff_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbShopStaff>> {
    let staff = sqlx::query_as::<_, DbShopStaff>(
        r#"
        SELECT id, shop_id, profile_id, display_name, active, created_at
        FROM shop_staff
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(staff)
}

pub async fn get_staff_by_shop(pool: &Pool<Postgres>, shop_id: Uuid) -> Result<Vec<DbShopStaff>> {
    let staff = sqlx::query_as::<_, DbShopStaff>(
        r#"
        SELECT id, shop_id, profile_id, display_name, active, created_at
        FROM shop_staff
        WHERE shop_id = $1
        ORDER BY display_name ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(staff)
}

/// Staff rows in `shop_id` linked to the given provider login.
pub async fn get_staff_for_profile(
    pool: &Pool<Postgres>,
    shop_id: Uuid,
    profile_id: Uuid,
) -> Result<Vec<DbShopStaff>> {
    let staff = sqlx::query_as::<_, DbShopStaff>(
        r#"
        SELECT id, shop_id, profile_id, display_name, active, created_at
        FROM shop_staff
        WHERE shop_id = $1 AND profile_id = $2
        "#,
    )
    .bind(shop_id)
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(staff)
}

pub async fn delete_staff(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM shop_staff
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

// Service Provider Repository

pub async fn assign_provider(
    pool: &Pool<Postgres>,
    service_id: Uuid,
    staff_id: Uuid,
) -> Result<DbServiceProvider> {
    let assignment = sqlx::query_as::<_, DbServiceProvider>(
        r#"
        INSERT INTO service_providers (service_id, staff_id)
        VALUES ($1, $2)
        ON CONFLICT (service_id, staff_id) DO UPDATE SET staff_id = EXCLUDED.staff_id
        RETURNING service_id, staff_id
        "#,
    )
    .bind(service_id)
    .bind(staff_id)
    .fetch_one(pool)
    .await?;

    Ok(assignment)
}

pub async fn unassign_provider(pool: &Pool<Postgres>, service_id: Uuid, staff_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM service_providers
        WHERE service_id = $1 AND staff_id = $2
        "#,
    )
    .bind(service_id)
    .bind(staff_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_providers_for_service(
    pool: &Pool<Postgres>,
    service_id: Uuid,
) -> Result<Vec<DbShopStaff>> {
    let staff = sqlx::query_as::<_, DbShopStaff>(
        r#"
        SELECT s.id, s.shop_id, s.profile_id, s.display_name, s.active, s.created_at
        FROM shop_staff s
        JOIN service_providers sp ON s.id = sp.staff_id
        WHERE sp.service_id = $1
        ORDER BY s.display_name ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    Ok(staff)
}
