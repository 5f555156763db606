//! Bookings and their status lifecycle.
//!
//! ```text
//! pending ──► approved ──► completed
//!    │            │
//!    ├──► rejected └──► cancelled
//!    └──► cancelled
//! ```
//!
//! Rescheduling moves a pending or approved booking back to pending.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::ShopService;
use super::profile::Profile;
use super::shop::Shop;
use super::time_slot::hhmm;
use crate::errors::{BookError, BookResult};

text_enum! {
    pub enum BookingStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Approved, Completed)
                | (Approved, Cancelled)
        )
    }

    pub fn transition(self, next: BookingStatus) -> BookResult<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BookError::Conflict(format!(
                "Booking cannot move from '{}' to '{}'",
                self, next
            )))
        }
    }

    pub fn reschedule(self) -> BookResult<BookingStatus> {
        match self {
            BookingStatus::Pending | BookingStatus::Approved => Ok(BookingStatus::Pending),
            other => Err(BookError::Conflict(format!(
                "Booking in status '{}' cannot be rescheduled",
                other
            ))),
        }
    }
}

/// How the caller relates to a booking. Decides which status changes they may
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Customer,
    Provider,
    ShopManager,
    Admin,
}

impl BookingActor {
    /// Strongest relation `profile` has to `booking`, if any. `staff_ids` are
    /// the staff rows of the booking's shop linked to the profile; only the
    /// one assigned to the booking makes the caller its provider.
    pub fn resolve(
        profile: &Profile,
        shop: &Shop,
        booking: &Booking,
        staff_ids: &[Uuid],
    ) -> Option<BookingActor> {
        let assigned = booking
            .provider_id
            .is_some_and(|provider_id| staff_ids.contains(&provider_id));

        if profile.role.is_admin() {
            Some(BookingActor::Admin)
        } else if shop.managed_by(profile) {
            Some(BookingActor::ShopManager)
        } else if booking.customer_id == profile.id {
            Some(BookingActor::Customer)
        } else if assigned {
            Some(BookingActor::Provider)
        } else {
            None
        }
    }

    pub fn may_set(&self, status: BookingStatus) -> bool {
        match self {
            BookingActor::Customer => status == BookingStatus::Cancelled,
            BookingActor::Provider | BookingActor::ShopManager | BookingActor::Admin => true,
        }
    }

    pub fn may_reschedule(&self) -> bool {
        !matches!(self, BookingActor::Provider)
    }
}

/// Snapshot of a service at booking time. Later price edits don't change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedService {
    pub service_id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: i32,
}

impl From<&ShopService> for BookedService {
    fn from(service: &ShopService) -> Self {
        Self {
            service_id: service.id,
            name: service.name.clone(),
            price_cents: service.price_cents,
            duration_minutes: service.duration_minutes,
        }
    }
}

pub fn total_cents(services: &[BookedService]) -> i64 {
    services.iter().map(|s| s.price_cents).sum()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub services: Vec<BookedService>,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub status: BookingStatus,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub shop_id: Uuid,
    pub service_ids: Vec<Uuid>,
    pub provider_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    pub fn validate(&self) -> BookResult<()> {
        if self.service_ids.is_empty() {
            return Err(BookError::Validation("At least one service must be selected".to_string()));
        }
        let mut seen = self.service_ids.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.service_ids.len() {
            return Err(BookError::Validation("Services must not repeat".to_string()));
        }
        Ok(())
    }
}

/// Resolves the requested ids against the shop's catalog into snapshots.
pub fn select_services(
    requested: &[Uuid],
    catalog: &[ShopService],
) -> BookResult<Vec<BookedService>> {
    requested
        .iter()
        .map(|id| {
            catalog
                .iter()
                .find(|s| s.id == *id && s.active)
                .map(BookedService::from)
                .ok_or_else(|| {
                    BookError::Validation(format!("Service {} is not offered by this shop", id))
                })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    pub reason: Option<String>,
}

impl UpdateBookingStatusRequest {
    /// Returns the trimmed reason; rejecting without one is an error.
    pub fn validated_reason(&self) -> BookResult<Option<String>> {
        let reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        if self.status == BookingStatus::Rejected && reason.is_none() {
            return Err(BookError::Validation(
                "A reason is required when rejecting a booking".to_string(),
            ));
        }
        Ok(reason)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleBookingRequest {
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
    pub date: Option<String>,
}

impl BookingListQuery {
    pub fn parsed(&self) -> BookResult<(Option<BookingStatus>, Option<NaiveDate>)> {
        let status = self.status.as_deref().map(str::parse::<BookingStatus>).transpose()?;
        let date = self
            .date
            .as_deref()
            .map(super::time_slot::parse_date)
            .transpose()?;
        Ok((status, date))
    }
}
