//! Application constants and the responder configuration file.
//!
//! The configuration is a single JSON document describing the patient, the
//! pre-selected hospitals, the emergency contacts and how alerts are sent.
//! Every field has a default so a partial file is valid.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hospital::SelectionWeights;
use crate::models::{Coordinates, EmergencyContact, EmergencyServices, Hospital, PatientProfile};
use crate::notify::DEFAULT_HOSPITAL_ALERT_TEMPLATE;

/// Application-level constants
pub const APP_NAME: &str = "EmergencyAssist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of delivery attempts per hospital before moving down the ranking.
pub const DEFAULT_MAX_ALERT_ATTEMPTS: u32 = 2;

/// Default webhook timeout.
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Get the application data directory (~/EmergencyAssist/).
///
/// Falls back to the current directory when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the incident database.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("emergency_assist.db")
}

/// Default location of the responder configuration file.
pub fn default_config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "emergency_assist=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How outbound notifications are delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotifierConfig {
    /// Record notifications in the structured log only.
    #[default]
    Log,
    /// POST each notification as JSON to a relay endpoint.
    Webhook {
        url: String,
        #[serde(default = "default_webhook_timeout")]
        timeout_secs: u64,
    },
}

fn default_webhook_timeout() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_SECS
}

/// Everything the emergency protocol needs to know about its surroundings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    pub patient: PatientProfile,
    pub hospitals: Vec<Hospital>,
    pub contacts: Vec<EmergencyContact>,
    pub emergency_services: EmergencyServices,
    pub weights: SelectionWeights,
    pub max_alert_attempts: u32,
    pub hospital_alert_template: String,
    pub notifier: NotifierConfig,
    pub database_path: Option<PathBuf>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            patient: PatientProfile::default(),
            hospitals: default_hospitals(),
            contacts: default_contacts(),
            emergency_services: EmergencyServices::default(),
            weights: SelectionWeights::default(),
            max_alert_attempts: DEFAULT_MAX_ALERT_ATTEMPTS,
            hospital_alert_template: DEFAULT_HOSPITAL_ALERT_TEMPLATE.to_string(),
            notifier: NotifierConfig::default(),
            database_path: None,
        }
    }
}

fn default_hospitals() -> Vec<Hospital> {
    vec![
        Hospital {
            id: "hosp_a".into(),
            name: "City General Hospital".into(),
            address: "123 Main St, Anytown".into(),
            contact_number: "+11234567890".into(),
            coordinates: Coordinates { lat: 34.0522, lon: -118.2437 },
        },
        Hospital {
            id: "hosp_b".into(),
            name: "Community Care Center".into(),
            address: "456 Oak Ave, Anytown".into(),
            contact_number: "+11234567891".into(),
            coordinates: Coordinates { lat: 34.0600, lon: -118.2500 },
        },
    ]
}

fn default_contacts() -> Vec<EmergencyContact> {
    vec![
        EmergencyContact {
            name: "Family Member".into(),
            phone: "+19876543210".into(),
        },
        EmergencyContact {
            name: "Close Friend".into(),
            phone: "+19998887777".into(),
        },
    ]
}

impl ResponderConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.patient.coordinates.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "patient coordinates out of range: {}",
                self.patient.coordinates
            )));
        }

        let mut seen = HashSet::new();
        for hospital in &self.hospitals {
            if !hospital.coordinates.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "hospital {} coordinates out of range: {}",
                    hospital.id, hospital.coordinates
                )));
            }
            if !seen.insert(hospital.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate hospital id: {}",
                    hospital.id
                )));
            }
        }

        let w = &self.weights;
        if w.travel_weight < 0.0 || w.wait_weight < 0.0 {
            return Err(ConfigError::Invalid("selection weights must be non-negative".into()));
        }
        if w.travel_weight + w.wait_weight <= 0.0 {
            return Err(ConfigError::Invalid("selection weights must not both be zero".into()));
        }

        if self.max_alert_attempts == 0 {
            return Err(ConfigError::Invalid("max_alert_attempts must be at least 1".into()));
        }

        if !self.hospital_alert_template.contains("{patient_address}") {
            return Err(ConfigError::Invalid(
                "hospital_alert_template must contain {patient_address}".into(),
            ));
        }

        if let NotifierConfig::Webhook { url, .. } = &self.notifier {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid("webhook url is empty".into()));
            }
        }

        Ok(())
    }

    /// Database path from the config, or the default under the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Read and validate a configuration file.
pub fn load_config(path: &Path) -> Result<ResponderConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let config: ResponderConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), hospitals = config.hospitals.len(), "Config loaded");
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the default configuration.
pub fn load_or_default(path: &Path) -> Result<ResponderConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        Ok(ResponderConfig::default())
    }
}

/// Write a configuration file, creating parent directories as needed.
pub fn save_config(path: &Path, config: &ResponderConfig) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}
