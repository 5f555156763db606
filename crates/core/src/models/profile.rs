use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscription::{SubscriptionStatus, SubscriptionSummary};
use crate::errors::{BookError, BookResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

text_enum! {
    /// What a profile is allowed to do across the platform.
    pub enum Role {
        Owner => "owner",
        Provider => "provider",
        Customer => "customer",
        SuperAdmin => "super_admin",
    }
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub business_name: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_plan: Option<String>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn subscription(&self, now: DateTime<Utc>) -> SubscriptionSummary {
        SubscriptionSummary::derive(
            self.subscription_status,
            self.trial_ends_at,
            self.subscription_started_at,
            self.current_period_end,
            now,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub business_name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> BookResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(BookError::Validation("A valid email address is required".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(BookError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if self.full_name.trim().is_empty() {
            return Err(BookError::Validation("Full name is required".to_string()));
        }
        if self.role == Role::SuperAdmin {
            return Err(BookError::Authorization(
                "Administrator accounts cannot be self-registered".to_string(),
            ));
        }
        Ok(())
    }

    /// Emails are matched case-insensitively.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: ProfileResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub business_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role,
            business_name: profile.business_name,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub business_name: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> BookResult<()> {
        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err(BookError::Validation("Full name cannot be empty".to_string()));
            }
        }
        Ok(())
    }
}
