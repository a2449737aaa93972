//! Emergency detection from a voice transcript and an automatic sensor trigger.
//!
//! Speech recognition and wearable sensors are external; both sit behind
//! traits so the protocol can run against scripted or simulated sources.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::TriggerKind;

/// Default probability that the simulated sensor reports an event.
pub const DEFAULT_SENSOR_PROBABILITY: f64 = 0.1;

#[derive(Error, Debug)]
pub enum DetectionError {
    /// Returned by live recognizers when the microphone or speech service
    /// cannot be reached. The scripted and silent sources never fail.
    #[error("Voice source unavailable: {0}")]
    VoiceUnavailable(String),

    #[error("Sensor state poisoned")]
    SensorPoisoned,
}

/// Source of spoken symptom descriptions.
pub trait VoiceSource: Send + Sync {
    /// Listen once. `Ok(None)` means nothing was said.
    fn listen(&self) -> Result<Option<String>, DetectionError>;
}

/// Automatic emergency trigger (fall detector, heart-rate alarm, ...).
pub trait SensorMonitor: Send + Sync {
    fn triggered(&self) -> Result<bool, DetectionError>;
}

/// Voice source that replays a fixed transcript.
pub struct ScriptedVoice {
    transcript: String,
}

impl ScriptedVoice {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self { transcript: transcript.into() }
    }
}

impl VoiceSource for ScriptedVoice {
    fn listen(&self) -> Result<Option<String>, DetectionError> {
        let text = self.transcript.trim();
        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(text.to_string()))
        }
    }
}

/// Voice source that never hears anything.
pub struct SilentVoice;

impl VoiceSource for SilentVoice {
    fn listen(&self) -> Result<Option<String>, DetectionError> {
        Ok(None)
    }
}

/// Sensor with a fixed reading.
pub struct FixedSensor(pub bool);

impl SensorMonitor for FixedSensor {
    fn triggered(&self) -> Result<bool, DetectionError> {
        Ok(self.0)
    }
}

/// Sensor that fires with a fixed probability per check, from a seeded RNG.
pub struct SimulatedSensor {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedSensor {
    pub fn new(probability: f64, seed: u64) -> Self {
        let probability = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        Self {
            probability,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SensorMonitor for SimulatedSensor {
    fn triggered(&self) -> Result<bool, DetectionError> {
        let mut rng = self.rng.lock().map_err(|_| DetectionError::SensorPoisoned)?;
        Ok(rng.gen_bool(self.probability))
    }
}

/// What set the protocol in motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencySignal {
    pub transcript: Option<String>,
    pub sensor_triggered: bool,
}

impl EmergencySignal {
    pub fn trigger_kind(&self) -> TriggerKind {
        match (self.transcript.is_some(), self.sensor_triggered) {
            (true, true) => TriggerKind::VoiceAndSensor,
            (true, false) => TriggerKind::Voice,
            (false, _) => TriggerKind::Sensor,
        }
    }

    /// Transcript text, or an empty description for sensor-only triggers.
    pub fn description(&self) -> &str {
        self.transcript.as_deref().unwrap_or("")
    }
}

/// Poll both sources. Returns `None` when neither reports an emergency.
pub fn detect(
    voice: &dyn VoiceSource,
    sensor: &dyn SensorMonitor,
) -> Result<Option<EmergencySignal>, DetectionError> {
    tracing::info!("Listening for voice command and checking emergency triggers");

    let transcript = voice.listen()?;
    let sensor_triggered = sensor.triggered()?;

    if transcript.is_none() && !sensor_triggered {
        tracing::debug!("No emergency detected");
        return Ok(None);
    }

    let signal = EmergencySignal { transcript, sensor_triggered };
    tracing::info!(trigger = %signal.trigger_kind(), "Emergency detected");
    Ok(Some(signal))
}
