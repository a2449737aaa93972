use chrono::Local;
use uuid::Uuid;

use crate::models::enums::DeliveryStatus;
use crate::models::NotificationRecord;
use crate::notify::{Notification, Notifier};

/// Send a notification, retrying up to `max_attempts` times.
///
/// Always returns a record; failures are captured in it, never propagated.
pub fn deliver_with_retry(
    notifier: &dyn Notifier,
    notification: &Notification,
    incident_id: Uuid,
    max_attempts: u32,
) -> NotificationRecord {
    let max_attempts = max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match notifier.send(notification) {
            Ok(receipt) => {
                tracing::info!(
                    kind = %notification.kind,
                    recipient = %notification.recipient_name,
                    attempt,
                    reference = %receipt.reference,
                    "Notification delivered"
                );
                return record(notification, incident_id, DeliveryStatus::Delivered, attempt, None);
            }
            Err(e) => {
                tracing::warn!(
                    kind = %notification.kind,
                    recipient = %notification.recipient_name,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Notification attempt failed"
                );
                last_error = Some(e.to_string());
            }
        }
    }

    record(notification, incident_id, DeliveryStatus::Failed, max_attempts, last_error)
}

fn record(
    notification: &Notification,
    incident_id: Uuid,
    status: DeliveryStatus,
    attempts: u32,
    error: Option<String>,
) -> NotificationRecord {
    NotificationRecord {
        id: Uuid::new_v4(),
        incident_id,
        kind: notification.kind,
        recipient_name: notification.recipient_name.clone(),
        recipient_phone: notification.recipient_phone.clone(),
        status,
        attempts,
        error,
        sent_at: Local::now().naive_local(),
    }
}
