use chrono::Local;
use rusqlite::Connection;
use uuid::Uuid;

use super::delivery::deliver_with_retry;
use super::{ProtocolError, ProtocolReport, ProtocolServices};
use crate::config::ResponderConfig;
use crate::db::record_incident;
use crate::detection::{detect, SensorMonitor, VoiceSource};
use crate::hospital::{rank_hospitals, RankedHospital};
use crate::models::enums::{NotificationKind, OutcomeKind, Severity};
use crate::models::{Incident, NotificationRecord, PatientProfile};
use crate::notify::{
    render_contact_message, render_emergency_services_alert, render_hospital_alert, Notification,
};
use crate::triage::TriageAssessment;

/// Contacts get one attempt each; they are informational.
const CONTACT_ATTEMPTS: u32 = 1;

pub struct EmergencyProtocol<'a> {
    config: &'a ResponderConfig,
    services: &'a ProtocolServices,
}

/// What the escalation stage decided before contacts are told.
struct Escalation {
    outcome: OutcomeKind,
    ranking: Vec<RankedHospital>,
    selected: Option<RankedHospital>,
    /// Sentence for the contact message describing what was done.
    contact_line: String,
}

impl<'a> EmergencyProtocol<'a> {
    pub fn new(config: &'a ResponderConfig, services: &'a ProtocolServices) -> Self {
        Self { config, services }
    }

    /// Run the protocol once for `patient`.
    ///
    /// Only detection failures abort; delivery failures end up in the report.
    pub fn execute(
        &self,
        patient: &PatientProfile,
        voice: &dyn VoiceSource,
        sensor: &dyn SensorMonitor,
    ) -> Result<ProtocolReport, ProtocolError> {
        let started_at = Local::now().naive_local();
        let incident_id = Uuid::new_v4();

        let Some(signal) = detect(voice, sensor)? else {
            tracing::info!("No emergency detected, protocol idle");
            let incident = Incident {
                id: incident_id,
                patient_id: patient.id,
                started_at,
                completed_at: Local::now().naive_local(),
                trigger: None,
                transcript: None,
                severity: Severity::Unknown,
                score: 0,
                summary: "No emergency detected".into(),
                outcome: OutcomeKind::NoEmergency,
                hospital_id: None,
            };
            return Ok(ProtocolReport {
                incident,
                signal: None,
                assessment: None,
                ranking: vec![],
                selected: None,
                notifications: vec![],
            });
        };

        let assessment = self
            .services
            .analyzer
            .analyze(signal.description(), &patient.medical_history);

        let mut notifications = Vec::new();
        let escalation = if assessment.is_critical() {
            self.escalate_critical(patient, &assessment, incident_id, &mut notifications)
        } else {
            self.alert_hospitals(patient, &assessment, incident_id, &mut notifications)
        };

        self.notify_contacts(patient, &escalation.contact_line, incident_id, &mut notifications);

        let incident = Incident {
            id: incident_id,
            patient_id: patient.id,
            started_at,
            completed_at: Local::now().naive_local(),
            trigger: Some(signal.trigger_kind()),
            transcript: signal.transcript.clone(),
            severity: assessment.severity,
            score: assessment.score,
            summary: assessment.summary.clone(),
            outcome: escalation.outcome,
            hospital_id: escalation.selected.as_ref().map(|r| r.hospital.id.clone()),
        };

        tracing::info!(
            incident_id = %incident.id,
            outcome = %incident.outcome,
            notifications = notifications.len(),
            "Emergency protocol complete"
        );

        Ok(ProtocolReport {
            incident,
            signal: Some(signal),
            assessment: Some(assessment),
            ranking: escalation.ranking,
            selected: escalation.selected,
            notifications,
        })
    }

    /// Critical cases skip hospital selection and go straight to dispatch.
    fn escalate_critical(
        &self,
        patient: &PatientProfile,
        assessment: &TriageAssessment,
        incident_id: Uuid,
        notifications: &mut Vec<NotificationRecord>,
    ) -> Escalation {
        let dispatch = &self.config.emergency_services;
        tracing::warn!(
            score = assessment.score,
            summary = %assessment.summary,
            "Critical emergency, contacting emergency services"
        );

        let notification = Notification {
            kind: NotificationKind::EmergencyServices,
            recipient_name: dispatch.name.clone(),
            recipient_phone: dispatch.phone.clone(),
            body: render_emergency_services_alert(patient, assessment),
        };
        let record = deliver_with_retry(
            self.services.notifier.as_ref(),
            &notification,
            incident_id,
            self.config.max_alert_attempts,
        );

        let contact_line = if record.delivered() {
            format!("{} have been contacted about {}", dispatch.name, assessment.summary.to_lowercase())
        } else {
            tracing::error!("Emergency services could not be reached");
            format!("{} could not be reached automatically, call {} now", dispatch.name, dispatch.phone)
        };
        notifications.push(record);

        Escalation {
            outcome: OutcomeKind::CriticalEscalated,
            ranking: vec![],
            selected: None,
            contact_line,
        }
    }

    /// Alert ranked hospitals in order until one accepts the alert.
    fn alert_hospitals(
        &self,
        patient: &PatientProfile,
        assessment: &TriageAssessment,
        incident_id: Uuid,
        notifications: &mut Vec<NotificationRecord>,
    ) -> Escalation {
        let ranking = rank_hospitals(
            patient.coordinates,
            &self.config.hospitals,
            self.services.availability.as_ref(),
            self.services.traffic.as_ref(),
            &self.config.weights,
        );
        let dispatch = &self.config.emergency_services;

        if ranking.is_empty() {
            tracing::error!("No available hospitals found");
            return Escalation {
                outcome: OutcomeKind::NoHospitalAvailable,
                ranking,
                selected: None,
                contact_line: format!("no hospital is accepting patients, call {} now", dispatch.phone),
            };
        }

        let body = render_hospital_alert(&self.config.hospital_alert_template, patient, &assessment.summary);
        let mut selected = None;

        for candidate in &ranking {
            tracing::info!(
                hospital = %candidate.hospital.id,
                score = candidate.score,
                travel_minutes = candidate.traffic.travel_minutes,
                wait_minutes = candidate.availability.wait_minutes,
                "Alerting hospital"
            );
            let notification = Notification {
                kind: NotificationKind::HospitalAlert,
                recipient_name: candidate.hospital.name.clone(),
                recipient_phone: candidate.hospital.contact_number.clone(),
                body: body.clone(),
            };
            let record = deliver_with_retry(
                self.services.notifier.as_ref(),
                &notification,
                incident_id,
                self.config.max_alert_attempts,
            );
            let delivered = record.delivered();
            notifications.push(record);
            if delivered {
                selected = Some(candidate.clone());
                break;
            }
            tracing::warn!(hospital = %candidate.hospital.id, "Hospital unreachable, trying next");
        }

        match selected {
            Some(chosen) => {
                let contact_line = format!(
                    "{} has been alerted, estimated travel time {} minutes",
                    chosen.hospital.name, chosen.traffic.travel_minutes
                );
                Escalation {
                    outcome: OutcomeKind::HospitalAlerted,
                    ranking,
                    selected: Some(chosen),
                    contact_line,
                }
            }
            None => {
                tracing::error!(tried = ranking.len(), "No hospital could be reached");
                Escalation {
                    outcome: OutcomeKind::NoHospitalReached,
                    ranking,
                    selected: None,
                    contact_line: format!("no hospital could be reached, call {} now", dispatch.phone),
                }
            }
        }
    }

    fn notify_contacts(
        &self,
        patient: &PatientProfile,
        contact_line: &str,
        incident_id: Uuid,
        notifications: &mut Vec<NotificationRecord>,
    ) {
        let body = render_contact_message(patient, contact_line);
        for contact in &self.config.contacts {
            let notification = Notification {
                kind: NotificationKind::Contact,
                recipient_name: contact.name.clone(),
                recipient_phone: contact.phone.clone(),
                body: body.clone(),
            };
            notifications.push(deliver_with_retry(
                self.services.notifier.as_ref(),
                &notification,
                incident_id,
                CONTACT_ATTEMPTS,
            ));
        }
    }
}

/// Execute the protocol and persist the incident with its notifications.
pub fn run_and_record(
    conn: &mut Connection,
    protocol: &EmergencyProtocol<'_>,
    patient: &PatientProfile,
    voice: &dyn VoiceSource,
    sensor: &dyn SensorMonitor,
) -> Result<ProtocolReport, ProtocolError> {
    let report = protocol.execute(patient, voice, sensor)?;
    record_incident(conn, &report.incident, &report.notifications)?;
    Ok(report)
}
