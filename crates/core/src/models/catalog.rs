//! What a shop offers (services) and who performs it (staff).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookError, BookResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopService {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i32,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> BookResult<()> {
        validate_service_fields(Some(&self.name), Some(self.price_cents), Some(self.duration_minutes))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<i32>,
    pub active: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> BookResult<()> {
        validate_service_fields(self.name.as_deref(), self.price_cents, self.duration_minutes)
    }
}

fn validate_service_fields(
    name: Option<&str>,
    price_cents: Option<i64>,
    duration_minutes: Option<i32>,
) -> BookResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(BookError::Validation("Service name is required".to_string()));
    }
    if price_cents.is_some_and(|p| p < 0) {
        return Err(BookError::Validation("Price cannot be negative".to_string()));
    }
    if duration_minutes.is_some_and(|d| d <= 0) {
        return Err(BookError::Validation("Duration must be positive".to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStaff {
    pub id: Uuid,
    pub shop_id: Uuid,
    /// Set when the staff member has their own provider login.
    pub profile_id: Option<Uuid>,
    pub display_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub display_name: String,
    pub profile_id: Option<Uuid>,
}

impl CreateStaffRequest {
    pub fn validate(&self) -> BookResult<()> {
        if self.display_name.trim().is_empty() {
            return Err(BookError::Validation("Staff display name is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub service_id: Uuid,
    pub staff_id: Uuid,
}
