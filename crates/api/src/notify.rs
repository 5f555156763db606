//! Outbound notifications.
//!
//! Booking and review events are POSTed as JSON to `NOTIFY_WEBHOOK_URL`,
//! where a mail-sending service picks them up. Delivery happens on a spawned
//! task; a failed delivery is logged and never fails the request that
//! triggered it.

use serde::Serialize;
use serde_json::{json, Value};
use slotbook_core::models::{booking::Booking, shop::Shop};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingCreated,
    BookingStatusChanged,
    BookingRescheduled,
    ShopReviewed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: String,
    pub subject: String,
    pub data: Value,
}

impl Notification {
    pub fn booking_created(recipient: &str, shop: &Shop, booking: &Booking) -> Self {
        Self {
            kind: NotificationKind::BookingCreated,
            recipient: recipient.to_string(),
            subject: format!("New booking request at {}", shop.name),
            data: booking_data(shop, booking),
        }
    }

    pub fn booking_status_changed(recipient: &str, shop: &Shop, booking: &Booking) -> Self {
        Self {
            kind: NotificationKind::BookingStatusChanged,
            recipient: recipient.to_string(),
            subject: format!("Your booking at {} is now {}", shop.name, booking.status),
            data: booking_data(shop, booking),
        }
    }

    pub fn booking_rescheduled(recipient: &str, shop: &Shop, booking: &Booking) -> Self {
        Self {
            kind: NotificationKind::BookingRescheduled,
            recipient: recipient.to_string(),
            subject: format!(
                "Booking at {} moved to {} {}",
                shop.name,
                booking.appointment_date,
                booking.appointment_time.format("%H:%M")
            ),
            data: booking_data(shop, booking),
        }
    }

    pub fn shop_reviewed(recipient: &str, shop: &Shop) -> Self {
        Self {
            kind: NotificationKind::ShopReviewed,
            recipient: recipient.to_string(),
            subject: format!("{} is now {}", shop.name, shop.status),
            data: json!({
                "shop_id": shop.id,
                "shop_name": shop.name,
                "status": shop.status,
                "reason": shop.rejection_reason,
            }),
        }
    }
}

fn booking_data(shop: &Shop, booking: &Booking) -> Value {
    json!({
        "shop_id": shop.id,
        "shop_name": shop.name,
        "booking": booking,
    })
}

/// Sends notifications to the configured webhook, or drops them when none is set.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl Notifier {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn notify(&self, notification: Notification) {
        let Some(endpoint) = self.endpoint.clone() else {
            debug!(
                "Notifications disabled, dropping {:?} for {}",
                notification.kind, notification.recipient
            );
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            match client.post(&endpoint).json(&notification).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Delivered {:?} to {}", notification.kind, notification.recipient);
                }
                Ok(response) => {
                    warn!(
                        "Notification endpoint answered {} for {:?}",
                        response.status(),
                        notification.kind
                    );
                }
                Err(e) => {
                    warn!("Failed to deliver {:?}: {}", notification.kind, e);
                }
            }
        });
    }
}
