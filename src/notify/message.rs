use crate::models::{patient_brief, PatientProfile};
use crate::triage::TriageAssessment;

/// Hospital alert template. Placeholders: `{patient_address}`,
/// `{symptoms_summary}`, `{medical_history_summary}`.
pub const DEFAULT_HOSPITAL_ALERT_TEMPLATE: &str = "Emergency: Immediate medical assistance required. \
Patient at {patient_address}. Symptoms: {symptoms_summary}. \
Medical History: {medical_history_summary}. \
Please confirm availability and estimated time of arrival. This is an urgent request.";

/// Fill the hospital alert template for this patient.
pub fn render_hospital_alert(template: &str, patient: &PatientProfile, symptoms_summary: &str) -> String {
    let history = serde_json::to_string(&patient.medical_history).unwrap_or_else(|_| "{}".to_string());
    template
        .replace("{patient_address}", &patient.address)
        .replace("{symptoms_summary}", symptoms_summary)
        .replace("{medical_history_summary}", &history)
}

/// Dispatch message for critical cases that bypass hospital selection.
pub fn render_emergency_services_alert(patient: &PatientProfile, assessment: &TriageAssessment) -> String {
    let history = &patient.medical_history;
    let list = |items: &[String]| {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join(", ")
        }
    };

    format!(
        "CRITICAL EMERGENCY: {summary} (triage score {score}/100).\n\
         {brief}\n\
         Allergies: {allergies}\n\
         Medications: {medications}\n\
         Location: {address} ({coords})\n\
         Immediate dispatch requested.",
        summary = assessment.summary,
        score = assessment.score,
        brief = patient_brief(patient),
        allergies = list(&history.allergies),
        medications = list(&history.medications),
        address = patient.address,
        coords = patient.coordinates,
    )
}

/// Message for emergency contacts. `outcome_line` says what has been done.
pub fn render_contact_message(patient: &PatientProfile, outcome_line: &str) -> String {
    let name = if patient.name.trim().is_empty() {
        "your contact"
    } else {
        patient.name.as_str()
    };
    format!(
        "Emergency alert for {name}: {outcome_line}. Location: {address}.",
        address = patient.address
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Severity;
    use crate::models::MedicalHistory;

    fn patient() -> PatientProfile {
        PatientProfile {
            name: "Sam Ortiz".into(),
            age: Some(71),
            blood_type: Some("B+".into()),
            ..PatientProfile::default()
        }
    }

    #[test]
    fn hospital_alert_fills_every_placeholder() {
        let body = render_hospital_alert(DEFAULT_HOSPITAL_ALERT_TEMPLATE, &patient(), "Chest pain");
        assert!(body.starts_with("Emergency: Immediate medical assistance required."));
        assert!(body.contains("Patient at 123 Main St, Apt 4B."));
        assert!(body.contains("Symptoms: Chest pain."));
        assert!(body.contains(
            r#"Medical History: {"allergies":["Penicillin"],"conditions":["Asthma"],"medications":["Inhaler"]}"#
        ));
        assert!(!body.contains("{patient_address}"));
        assert!(!body.contains("{symptoms_summary}"));
    }

    #[test]
    fn custom_template() {
        let body = render_hospital_alert("At {patient_address}: {symptoms_summary}", &patient(), "Seizure");
        assert_eq!(body, "At 123 Main St, Apt 4B: Seizure");
    }

    #[test]
    fn emergency_services_alert_carries_identity_and_location() {
        let assessment = TriageAssessment {
            summary: "Difficulty breathing".into(),
            severity: Severity::Critical,
            score: 100,
            matched_rules: vec!["TRI-002".into()],
            risk_factors: vec!["Asthma".into()],
        };
        let body = render_emergency_services_alert(&patient(), &assessment);
        assert!(body.starts_with("CRITICAL EMERGENCY: Difficulty breathing (triage score 100/100)."));
        assert!(body.contains("Name: Sam Ortiz"));
        assert!(body.contains("Blood Type: B+"));
        assert!(body.contains("Allergies: Penicillin"));
        assert!(body.contains("Location: 123 Main St, Apt 4B (34.0550, -118.2450)"));
    }

    #[test]
    fn empty_history_lists_none() {
        let p = PatientProfile {
            medical_history: MedicalHistory::default(),
            ..patient()
        };
        let assessment = TriageAssessment {
            summary: "Seizure".into(),
            severity: Severity::Critical,
            score: 88,
            matched_rules: vec![],
            risk_factors: vec![],
        };
        let body = render_emergency_services_alert(&p, &assessment);
        assert!(body.contains("Allergies: None"));
        assert!(body.contains("Medications: None"));
        assert!(body.contains("Known Conditions: None"));
    }

    #[test]
    fn contact_message_names_patient() {
        let body = render_contact_message(&patient(), "City General Hospital has been alerted");
        assert_eq!(
            body,
            "Emergency alert for Sam Ortiz: City General Hospital has been alerted. Location: 123 Main St, Apt 4B."
        );
    }

    #[test]
    fn contact_message_without_name() {
        let p = PatientProfile { name: " ".into(), ..patient() };
        assert!(render_contact_message(&p, "help is on the way").starts_with("Emergency alert for your contact:"));
    }
}
