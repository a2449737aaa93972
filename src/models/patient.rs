use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalHistory {
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientProfile {
    pub id: Uuid,
    pub name: String,
    pub age: Option<u32>,
    pub blood_type: Option<String>,
    pub address: String,
    pub coordinates: Coordinates,
    pub medical_history: MedicalHistory,
}

impl Default for PatientProfile {
    /// The sample patient used when no configuration is present.
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "Unknown".into(),
            age: None,
            blood_type: None,
            address: "123 Main St, Apt 4B".into(),
            coordinates: Coordinates { lat: 34.0550, lon: -118.2450 },
            medical_history: MedicalHistory {
                allergies: vec!["Penicillin".into()],
                conditions: vec!["Asthma".into()],
                medications: vec!["Inhaler".into()],
            },
        }
    }
}

/// Short identity block handed to responders.
pub fn patient_brief(patient: &PatientProfile) -> String {
    let name = if patient.name.trim().is_empty() {
        "Unknown"
    } else {
        patient.name.as_str()
    };
    let age = patient
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Unknown".into());
    let blood_type = patient.blood_type.as_deref().unwrap_or("Unknown");
    let conditions = if patient.medical_history.conditions.is_empty() {
        "None".to_string()
    } else {
        patient.medical_history.conditions.join(", ")
    };

    format!(
        "Name: {name}\nAge: {age}\nBlood Type: {blood_type}\nKnown Conditions: {conditions}"
    )
}
