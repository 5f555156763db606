//! Owner subscription state.
//!
//! Billing happens at the payment processor; this module only interprets the
//! dates stored on a profile relative to the current instant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookError, BookResult};

pub const TRIAL_DAYS: i64 = 14;
pub const REFUND_WINDOW_DAYS: i64 = 14;

text_enum! {
    /// Status as last recorded from the payment processor.
    pub enum SubscriptionStatus {
        None => "none",
        Trialing => "trialing",
        Active => "active",
        PastDue => "past_due",
        Canceled => "canceled",
    }
}

/// Status interpreted against the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    None,
    Trial,
    Active,
    PastDue,
    Canceled,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub status: SubscriptionStatus,
    pub state: SubscriptionState,
    pub has_access: bool,
    pub trial_days_remaining: Option<i64>,
    pub in_refund_window: bool,
    pub refund_window_ends_at: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
}

impl SubscriptionSummary {
    pub fn derive(
        status: SubscriptionStatus,
        trial_ends_at: Option<DateTime<Utc>>,
        started_at: Option<DateTime<Utc>>,
        current_period_end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let period_open = current_period_end.map_or(true, |end| end > now);

        let (state, has_access) = match status {
            SubscriptionStatus::None => (SubscriptionState::None, false),
            SubscriptionStatus::Trialing => match trial_ends_at {
                Some(end) if end > now => (SubscriptionState::Trial, true),
                _ => (SubscriptionState::Expired, false),
            },
            SubscriptionStatus::Active if period_open => (SubscriptionState::Active, true),
            SubscriptionStatus::Active => (SubscriptionState::Expired, false),
            SubscriptionStatus::PastDue => (SubscriptionState::PastDue, false),
            // Paid time already bought stays usable after cancelling.
            SubscriptionStatus::Canceled => (
                SubscriptionState::Canceled,
                current_period_end.is_some_and(|end| end > now),
            ),
        };

        let trial_days_remaining = match (state, trial_ends_at) {
            (SubscriptionState::Trial, Some(end)) => Some(days_rounded_up(end - now)),
            _ => None,
        };

        let refund_window_ends_at = started_at.map(|start| start + Duration::days(REFUND_WINDOW_DAYS));
        let in_refund_window = state == SubscriptionState::Active
            && started_at.is_some_and(|start| start <= now)
            && refund_window_ends_at.is_some_and(|end| now < end);

        Self {
            status,
            state,
            has_access,
            trial_days_remaining,
            in_refund_window,
            refund_window_ends_at,
            trial_ends_at,
            current_period_end,
        }
    }
}

fn days_rounded_up(remaining: Duration) -> i64 {
    let seconds = remaining.num_seconds().max(0);
    let day = 24 * 60 * 60;
    (seconds + day - 1) / day
}

/// Checks that a trial may start from `status`.
pub fn ensure_can_start_trial(status: SubscriptionStatus) -> BookResult<()> {
    match status {
        SubscriptionStatus::None => Ok(()),
        other => Err(BookError::Conflict(format!(
            "A trial can only start without an existing subscription (current: {})",
            other
        ))),
    }
}

pub fn ensure_can_cancel(status: SubscriptionStatus) -> BookResult<()> {
    match status {
        SubscriptionStatus::Trialing | SubscriptionStatus::Active => Ok(()),
        other => Err(BookError::Conflict(format!(
            "Subscription in status '{}' cannot be cancelled",
            other
        ))),
    }
}

pub fn trial_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(TRIAL_DAYS)
}

/// Written by an administrator when syncing state from the payment processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSubscriptionUpdate {
    pub status: SubscriptionStatus,
    pub plan: Option<String>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
}

impl AdminSubscriptionUpdate {
    pub fn validate(&self) -> BookResult<()> {
        if self.status == SubscriptionStatus::Trialing && self.trial_ends_at.is_none() {
            return Err(BookError::Validation(
                "trial_ends_at is required for a trialing subscription".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.subscription_started_at, self.current_period_end) {
            if end <= start {
                return Err(BookError::Validation(
                    "current_period_end must be after subscription_started_at".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub profile_id: Uuid,
    pub plan: Option<String>,
    #[serde(flatten)]
    pub summary: SubscriptionSummary,
}
