use crate::models::DbShop;
use chrono::Utc;
use eyre::{eyre, Result};
use slotbook_core::models::{shop::ShopStatus, time_slot::OperatingHours};
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

const SHOP_COLUMNS: &str = "id, owner_id, name, description, address, phone, timezone, status, \
     rejection_reason, operating_hours, manual_closed, created_at, updated_at";

pub struct NewShop<'a> {
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub timezone: &'a str,
    pub operating_hours: &'a OperatingHours,
}

#[derive(Default)]
pub struct ShopChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub timezone: Option<&'a str>,
    pub operating_hours: Option<&'a OperatingHours>,
}

pub async fn create_shop(pool: &Pool<Postgres>, shop: NewShop<'_>) -> Result<DbShop> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating shop: id={}, owner={}, name={}", id, shop.owner_id, shop.name);

    let created = sqlx::query_as::<_, DbShop>(&format!(
        r#"
        INSERT INTO shops (id, owner_id, name, description, address, phone, timezone, status,
                           operating_hours, manual_closed, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $10)
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(shop.owner_id)
    .bind(shop.name)
    .bind(shop.description)
    .bind(shop.address)
    .bind(shop.phone)
    .bind(shop.timezone)
    .bind(ShopStatus::Draft.as_str())
    .bind(Json(shop.operating_hours))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn get_shop_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbShop>> {
    let shop = sqlx::query_as::<_, DbShop>(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(shop)
}

pub async fn get_shops_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<DbShop>> {
    let shops = sqlx::query_as::<_, DbShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM shops WHERE owner_id = $1 ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(shops)
}

pub async fn get_shops_by_status(pool: &Pool<Postgres>, status: ShopStatus) -> Result<Vec<DbShop>> {
    let shops = sqlx::query_as::<_, DbShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM shops WHERE status = $1 ORDER BY updated_at ASC"
    ))
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    Ok(shops)
}

/// Approved shops, optionally filtered by a case-insensitive name fragment.
pub async fn search_public_shops(pool: &Pool<Postgres>, query: Option<&str>) -> Result<Vec<DbShop>> {
    let pattern = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q.replace('%', "\\%").replace('_', "\\_")));

    let shops = sqlx::query_as::<_, DbShop>(&format!(
        r#"
        SELECT {SHOP_COLUMNS}
        FROM shops
        WHERE status = $1 AND ($2::TEXT IS NULL OR name ILIKE $2)
        ORDER BY name ASC
        "#
    ))
    .bind(ShopStatus::Approved.as_str())
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(shops)
}

pub async fn update_shop(pool: &Pool<Postgres>, id: Uuid, changes: ShopChanges<'_>) -> Result<DbShop> {
    let shop = get_shop_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Shop not found"))?;

    let name = changes.name.unwrap_or(&shop.name);
    let description = changes.description.or(shop.description.as_deref());
    let address = changes.address.or(shop.address.as_deref());
    let phone = changes.phone.or(shop.phone.as_deref());
    let timezone = changes.timezone.unwrap_or(&shop.timezone);
    let hours = changes.operating_hours.unwrap_or(&shop.operating_hours.0);

    let updated = sqlx::query_as::<_, DbShop>(&format!(
        r#"
        UPDATE shops
        SET name = $2, description = $3, address = $4, phone = $5, timezone = $6,
            operating_hours = $7, updated_at = $8
        WHERE id = $1
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(address)
    .bind(phone)
    .bind(timezone)
    .bind(Json(hours))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

/// Writes a new listing status. `rejection_reason` is cleared unless given.
pub async fn set_shop_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: ShopStatus,
    rejection_reason: Option<&str>,
) -> Result<DbShop> {
    tracing::debug!("Setting shop status: id={}, status={}", id, status);

    let updated = sqlx::query_as::<_, DbShop>(&format!(
        r#"
        UPDATE shops
        SET status = $2, rejection_reason = $3, updated_at = $4
        WHERE id = $1
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(rejection_reason)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Shop not found"))?;

    Ok(updated)
}

pub async fn set_manual_closed(pool: &Pool<Postgres>, id: Uuid, manual_closed: bool) -> Result<DbShop> {
    let updated = sqlx::query_as::<_, DbShop>(&format!(
        r#"
        UPDATE shops
        SET manual_closed = $2, updated_at = $3
        WHERE id = $1
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(manual_closed)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Shop not found"))?;

    Ok(updated)
}
