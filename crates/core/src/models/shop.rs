use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::Profile;
use super::time_slot::{format_slot, OperatingHours};
use crate::errors::{BookError, BookResult};

pub const DEFAULT_TIMEZONE: &str = "UTC";

text_enum! {
    /// Listing state of a shop. Only approved shops are public and bookable.
    pub enum ShopStatus {
        Draft => "draft",
        PendingReview => "pending_review",
        Approved => "approved",
        Rejected => "rejected",
        Suspended => "suspended",
    }
}

impl ShopStatus {
    /// Owner submission for review.
    pub fn submit(self) -> BookResult<ShopStatus> {
        match self {
            ShopStatus::Draft | ShopStatus::Rejected => Ok(ShopStatus::PendingReview),
            other => Err(BookError::Conflict(format!(
                "Shop in status '{}' cannot be submitted for review",
                other
            ))),
        }
    }

    pub fn review(self, decision: ReviewDecision) -> BookResult<ShopStatus> {
        use ReviewDecision::*;
        use ShopStatus::*;

        match (self, decision) {
            (PendingReview, Approve) => Ok(Approved),
            (PendingReview, Reject) => Ok(Rejected),
            (Approved, Suspend) => Ok(Suspended),
            (Suspended, Reinstate) => Ok(Approved),
            (from, decision) => Err(BookError::Conflict(format!(
                "Cannot {} a shop in status '{}'",
                decision.as_str(),
                from
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
    Suspend,
    Reinstate,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Reject => "reject",
            ReviewDecision::Suspend => "suspend",
            ReviewDecision::Reinstate => "reinstate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub timezone: String,
    pub status: ShopStatus,
    pub rejection_reason: Option<String>,
    pub operating_hours: OperatingHours,
    pub manual_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    pub fn is_bookable(&self) -> bool {
        self.status == ShopStatus::Approved && !self.manual_closed
    }

    /// Current wall-clock time at the shop.
    pub fn local_now(&self, now: DateTime<Utc>) -> NaiveDateTime {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => now.with_timezone(&tz).naive_local(),
            Err(_) => now.naive_utc(),
        }
    }

    /// Bookable slots on `date`, excluding times already past at the shop.
    pub fn available_slots(
        &self,
        date: NaiveDate,
        step_minutes: u32,
        now: DateTime<Utc>,
    ) -> Vec<NaiveTime> {
        if self.manual_closed {
            return Vec::new();
        }
        self.operating_hours
            .slots_on(date, step_minutes, Some(self.local_now(now)))
    }

    /// Checks that `time` on `date` is one of the generated slots.
    pub fn ensure_slot_available(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        step_minutes: u32,
        now: DateTime<Utc>,
    ) -> BookResult<()> {
        if self.available_slots(date, step_minutes, now).contains(&time) {
            Ok(())
        } else {
            Err(BookError::Validation(format!(
                "{} {} is not an available slot",
                date,
                format_slot(time)
            )))
        }
    }

    /// Owners manage their own shops; administrators manage every shop.
    pub fn managed_by(&self, profile: &Profile) -> bool {
        profile.role.is_admin() || profile.id == self.owner_id
    }
}

pub fn validate_timezone(timezone: &str) -> BookResult<()> {
    timezone
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| BookError::Validation(format!("Unknown timezone '{}'", timezone)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub operating_hours: OperatingHours,
}

impl CreateShopRequest {
    pub fn validate(&self) -> BookResult<()> {
        if self.name.trim().is_empty() {
            return Err(BookError::Validation("Shop name is required".to_string()));
        }
        if let Some(timezone) = &self.timezone {
            validate_timezone(timezone)?;
        }
        self.operating_hours.validate()
    }

    pub fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub operating_hours: Option<OperatingHours>,
}

impl UpdateShopRequest {
    pub fn validate(&self) -> BookResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(BookError::Validation("Shop name cannot be empty".to_string()));
            }
        }
        if let Some(timezone) = &self.timezone {
            validate_timezone(timezone)?;
        }
        if let Some(hours) = &self.operating_hours {
            hours.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopReviewRequest {
    pub decision: ReviewDecision,
    pub reason: Option<String>,
}

impl ShopReviewRequest {
    /// Returns the trimmed reason; rejecting without one is an error.
    pub fn validated_reason(&self) -> BookResult<Option<String>> {
        let reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        if self.decision == ReviewDecision::Reject && reason.is_none() {
            return Err(BookError::Validation(
                "A reason is required when rejecting a shop".to_string(),
            ));
        }
        Ok(reason)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetClosedRequest {
    pub manual_closed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopStatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}
