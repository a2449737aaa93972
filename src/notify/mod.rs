//! Outbound notifications to hospitals, emergency services and contacts.
//!
//! SMS and voice carriers are external. `Notifier` is the seam: the log
//! notifier records to `tracing`, the webhook notifier hands the message to
//! a relay that owns the carrier integration.

pub mod message;
pub mod log;
pub mod webhook;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::NotificationKind;

pub use self::log::LogNotifier;
pub use message::{
    render_contact_message, render_emergency_services_alert, render_hospital_alert,
    DEFAULT_HOSPITAL_ALERT_TEMPLATE,
};
pub use webhook::WebhookNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Relay rejected notification with status {status}")]
    Rejected { status: u16 },

    #[error("Recipient has no phone number: {0}")]
    MissingRecipient(String),
}

/// A message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub body: String,
}

/// Proof of delivery returned by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub reference: String,
}

pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, NotifyError>;
}

/// Reject notifications that cannot be routed anywhere.
pub(crate) fn ensure_routable(notification: &Notification) -> Result<(), NotifyError> {
    if notification.recipient_phone.trim().is_empty() {
        return Err(NotifyError::MissingRecipient(notification.recipient_name.clone()));
    }
    Ok(())
}
