//! Emergency protocol: detect → triage → escalate or match a hospital →
//! alert → notify contacts → record.
//!
//! ```text
//! detect ─ none ──────────────────────────────────────────► no_emergency
//!    │
//! triage ─ critical ─► emergency services ─► contacts ────► critical_escalated
//!    │
//! rank ─── empty ────────────────────────► contacts ──────► no_hospital_available
//!    │
//! alert ranked hospitals in order (retrying each)
//!    ├─ delivered ───────────────────────► contacts ──────► hospital_alerted
//!    └─ all failed ──────────────────────► contacts ──────► no_hospital_reached
//! ```
//!
//! Notification failures never abort a run; they are recorded in the report.

pub mod delivery;
pub mod runner;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::NotifierConfig;
use crate::db::DatabaseError;
use crate::detection::{DetectionError, EmergencySignal};
use crate::hospital::{
    AvailabilityProvider, RankedHospital, SimulatedAvailability, SimulatedTraffic,
    TrafficEstimator,
};
use crate::models::enums::{NotificationKind, OutcomeKind};
use crate::models::{Incident, NotificationRecord};
use crate::notify::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
use crate::triage::{RuleBasedTriage, SymptomAnalyzer, TriageAssessment};

pub use runner::{run_and_record, EmergencyProtocol};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// External collaborators of the protocol, shareable across threads.
#[derive(Clone)]
pub struct ProtocolServices {
    pub analyzer: Arc<dyn SymptomAnalyzer>,
    pub availability: Arc<dyn AvailabilityProvider>,
    pub traffic: Arc<dyn TrafficEstimator>,
    pub notifier: Arc<dyn Notifier>,
}

impl ProtocolServices {
    /// Rule-based triage with seeded simulations for availability and traffic.
    pub fn simulated(seed: u64, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            analyzer: Arc::new(RuleBasedTriage),
            availability: Arc::new(SimulatedAvailability::new(seed)),
            // Offset so the two simulations draw independent streams.
            traffic: Arc::new(SimulatedTraffic::new(seed.wrapping_add(1))),
            notifier,
        }
    }
}

/// Build the configured notification transport.
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config {
        NotifierConfig::Log => Ok(Arc::new(LogNotifier)),
        NotifierConfig::Webhook { url, timeout_secs } => {
            Ok(Arc::new(WebhookNotifier::new(url, *timeout_secs)?))
        }
    }
}

/// Everything one protocol run decided and sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolReport {
    pub incident: Incident,
    pub signal: Option<EmergencySignal>,
    pub assessment: Option<TriageAssessment>,
    /// Accepting hospitals, best first. Empty for critical escalations.
    pub ranking: Vec<RankedHospital>,
    /// Hospital that acknowledged the alert.
    pub selected: Option<RankedHospital>,
    /// Send order: hospital or emergency-services alerts, then contacts.
    pub notifications: Vec<NotificationRecord>,
}

impl ProtocolReport {
    pub fn outcome(&self) -> OutcomeKind {
        self.incident.outcome
    }

    pub fn notifications_of(&self, kind: NotificationKind) -> impl Iterator<Item = &NotificationRecord> {
        self.notifications.iter().filter(move |n| n.kind == kind)
    }

    pub fn contacts_notified(&self) -> usize {
        self.notifications_of(NotificationKind::Contact)
            .filter(|n| n.delivered())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_config_builds_log_notifier() {
        assert!(build_notifier(&NotifierConfig::Log).is_ok());
    }

    #[test]
    fn webhook_config_builds_notifier() {
        let config = NotifierConfig::Webhook {
            url: "http://relay.local/notify".into(),
            timeout_secs: 3,
        };
        assert!(build_notifier(&config).is_ok());
    }

    #[test]
    fn services_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolServices>();
    }
}
