use crate::models::DbProfile;
use argon2::{Argon2, PasswordVerifier};
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use slotbook_core::models::{profile::Role, subscription::SubscriptionStatus};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, email, password_hash, full_name, role, business_name, \
     subscription_status, subscription_plan, trial_ends_at, subscription_started_at, \
     current_period_end, created_at";

pub async fn create_profile(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
    full_name: &str,
    role: Role,
    business_name: Option<&str>,
) -> Result<DbProfile> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating profile: id={}, role={}", id, role);

    let profile = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        INSERT INTO profiles (id, email, password_hash, full_name, role, business_name,
                              subscription_status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role.as_str())
    .bind(business_name)
    .bind(SubscriptionStatus::None.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// Whether `err` came from a unique constraint, such as a second profile
/// registering an email that was taken in the meantime.
pub fn is_unique_violation(err: &eyre::Report) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

pub async fn get_profile_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn update_profile(
    pool: &Pool<Postgres>,
    id: Uuid,
    full_name: Option<&str>,
    business_name: Option<&str>,
) -> Result<DbProfile> {
    let profile = get_profile_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Profile not found"))?;

    let full_name = full_name.unwrap_or(&profile.full_name);
    let business_name = business_name.or(profile.business_name.as_deref());

    let updated = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        UPDATE profiles
        SET full_name = $2, business_name = $3
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(full_name)
    .bind(business_name)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

pub async fn update_subscription(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: SubscriptionStatus,
    plan: Option<&str>,
    trial_ends_at: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    current_period_end: Option<DateTime<Utc>>,
) -> Result<DbProfile> {
    tracing::debug!("Updating subscription: profile={}, status={}", id, status);

    let updated = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        UPDATE profiles
        SET subscription_status = $2, subscription_plan = $3, trial_ends_at = $4,
            subscription_started_at = $5, current_period_end = $6
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(plan)
    .bind(trial_ends_at)
    .bind(started_at)
    .bind(current_period_end)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Profile not found"))?;

    Ok(updated)
}

/// Returns the profile when `password` matches its stored hash.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    email: &str,
    password: &str,
) -> Result<Option<DbProfile>> {
    let Some(profile) = get_profile_by_email(pool, email).await? else {
        return Ok(None);
    };

    let parsed_hash = argon2::PasswordHash::new(&profile.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid.then_some(profile))
}
