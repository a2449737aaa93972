use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DeliveryStatus, NotificationKind, OutcomeKind, Severity, TriggerKind};

/// One execution of the emergency protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub started_at: NaiveDateTime,
    pub completed_at: NaiveDateTime,
    /// `None` when nothing triggered the protocol.
    pub trigger: Option<TriggerKind>,
    pub transcript: Option<String>,
    pub severity: Severity,
    pub score: u8,
    pub summary: String,
    pub outcome: OutcomeKind,
    pub hospital_id: Option<String>,
}

/// Delivery record for a single recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub kind: NotificationKind,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub status: DeliveryStatus,
    pub attempts: u32,
    pub error: Option<String>,
    pub sent_at: NaiveDateTime,
}

impl NotificationRecord {
    pub fn delivered(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }
}
