use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Hospital, HospitalAvailability};

/// Probability that a simulated hospital is accepting patients.
const SIMULATED_ACCEPT_PROBABILITY: f64 = 0.8;
const SIMULATED_MIN_WAIT: u32 = 5;
const SIMULATED_MAX_WAIT: u32 = 60;

/// Reports whether a hospital is accepting patients and its current wait.
pub trait AvailabilityProvider: Send + Sync {
    fn check(&self, hospital: &Hospital) -> HospitalAvailability;
}

/// Random availability from a seeded RNG.
pub struct SimulatedAvailability {
    rng: Mutex<StdRng>,
}

impl SimulatedAvailability {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl AvailabilityProvider for SimulatedAvailability {
    fn check(&self, hospital: &Hospital) -> HospitalAvailability {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let accepting = rng.gen_bool(SIMULATED_ACCEPT_PROBABILITY);
        let wait = rng.gen_range(SIMULATED_MIN_WAIT..=SIMULATED_MAX_WAIT);

        let availability = if accepting {
            HospitalAvailability::accepting(wait)
        } else {
            HospitalAvailability::diverting()
        };
        tracing::info!(
            hospital = %hospital.name,
            status = %availability.status,
            wait_minutes = availability.wait_minutes,
            "Checked hospital availability"
        );
        availability
    }
}

/// Fixed availability table keyed by hospital id.
///
/// Hospitals missing from the table are reported as diverting.
#[derive(Debug, Default, Clone)]
pub struct StaticAvailability {
    table: HashMap<String, HospitalAvailability>,
}

impl StaticAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hospital_id: impl Into<String>, availability: HospitalAvailability) -> Self {
        self.table.insert(hospital_id.into(), availability);
        self
    }
}

impl AvailabilityProvider for StaticAvailability {
    fn check(&self, hospital: &Hospital) -> HospitalAvailability {
        self.table
            .get(&hospital.id)
            .copied()
            .unwrap_or_else(HospitalAvailability::diverting)
    }
}
