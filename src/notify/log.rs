use uuid::Uuid;

use super::{DeliveryReceipt, Notification, Notifier, NotifyError};

/// Records notifications as structured log events. Always delivers, even
/// when the recipient has no phone number.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, NotifyError> {
        let reference = format!("log-{}", Uuid::new_v4());
        tracing::info!(
            kind = %notification.kind,
            recipient = %notification.recipient_name,
            phone = %notification.recipient_phone,
            reference = %reference,
            body = %notification.body,
            "Notification sent"
        );
        Ok(DeliveryReceipt { reference })
    }
}
