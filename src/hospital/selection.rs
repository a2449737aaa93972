use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::availability::AvailabilityProvider;
use super::traffic::TrafficEstimator;
use crate::models::{Coordinates, Hospital, HospitalAvailability, TrafficAnalysis};

/// Relative weight of travel time and wait time in the hospital score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionWeights {
    pub travel_weight: f64,
    pub wait_weight: f64,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            travel_weight: 0.7,
            wait_weight: 0.3,
        }
    }
}

/// An accepting hospital with the inputs that produced its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHospital {
    pub hospital: Hospital,
    pub availability: HospitalAvailability,
    pub traffic: TrafficAnalysis,
    pub score: f64,
}

/// `travel_weight / travel + wait_weight / wait`, both clamped to at least one minute.
fn score(weights: &SelectionWeights, travel_minutes: u32, wait_minutes: u32) -> f64 {
    let travel = travel_minutes.max(1) as f64;
    let wait = wait_minutes.max(1) as f64;
    weights.travel_weight / travel + weights.wait_weight / wait
}

/// Rank accepting hospitals, best first.
///
/// Ties on score go to the shorter trip, then to the lower hospital id.
pub fn rank_hospitals(
    patient: Coordinates,
    hospitals: &[Hospital],
    availability: &dyn AvailabilityProvider,
    traffic: &dyn TrafficEstimator,
    weights: &SelectionWeights,
) -> Vec<RankedHospital> {
    tracing::info!(candidates = hospitals.len(), "Evaluating hospital options");

    let mut ranked: Vec<RankedHospital> = hospitals
        .iter()
        .filter_map(|hospital| {
            let avail = availability.check(hospital);
            let trip = traffic.estimate(patient, hospital);
            if !avail.is_available() {
                tracing::debug!(hospital = %hospital.id, "Hospital diverting, skipped");
                return None;
            }
            Some(RankedHospital {
                hospital: hospital.clone(),
                availability: avail,
                traffic: trip,
                score: score(weights, trip.travel_minutes, avail.wait_minutes),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.traffic.travel_minutes.cmp(&b.traffic.travel_minutes))
            .then_with(|| a.hospital.id.cmp(&b.hospital.id))
    });

    ranked
}

/// Best accepting hospital, or `None` when every hospital is diverting.
pub fn select_optimal_hospital(
    patient: Coordinates,
    hospitals: &[Hospital],
    availability: &dyn AvailabilityProvider,
    traffic: &dyn TrafficEstimator,
    weights: &SelectionWeights,
) -> Option<RankedHospital> {
    rank_hospitals(patient, hospitals, availability, traffic, weights)
        .into_iter()
        .next()
}
