use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::{
    errors::BookError,
    models::{
        booking::{BookedService, Booking},
        catalog::{ShopService, ShopStaff},
        profile::Profile,
        shop::Shop,
        time_slot::OperatingHours,
    },
};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub business_name: Option<String>,
    pub subscription_status: String,
    pub subscription_plan: Option<String>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbProfile> for Profile {
    type Error = BookError;

    fn try_from(row: DbProfile) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row.role.parse()?,
            business_name: row.business_name,
            subscription_status: row.subscription_status.parse()?,
            subscription_plan: row.subscription_plan,
            trial_ends_at: row.trial_ends_at,
            subscription_started_at: row.subscription_started_at,
            current_period_end: row.current_period_end,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub profile_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub timezone: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub operating_hours: Json<OperatingHours>,
    pub manual_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbShop> for Shop {
    type Error = BookError;

    fn try_from(row: DbShop) -> Result<Self, Self::Error> {
        Ok(Shop {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            address: row.address,
            phone: row.phone,
            timezone: row.timezone,
            status: row.status.parse()?,
            rejection_reason: row.rejection_reason,
            operating_hours: row.operating_hours.0,
            manual_closed: row.manual_closed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShopService {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbShopService> for ShopService {
    fn from(row: DbShopService) -> Self {
        ShopService {
            id: row.id,
            shop_id: row.shop_id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            duration_minutes: row.duration_minutes,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShopStaff {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub display_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbShopStaff> for ShopStaff {
    fn from(row: DbShopStaff) -> Self {
        ShopStaff {
            id: row.id,
            shop_id: row.shop_id,
            profile_id: row.profile_id,
            display_name: row.display_name,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbServiceProvider {
    pub service_id: Uuid,
    pub staff_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub services: Json<Vec<BookedService>>,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = BookError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            shop_id: row.shop_id,
            customer_id: row.customer_id,
            provider_id: row.provider_id,
            services: row.services.0,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            status: row.status.parse()?,
            total_cents: row.total_cents,
            notes: row.notes,
            status_reason: row.status_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
