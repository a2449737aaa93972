use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Coordinates, Hospital, TrafficAnalysis};

/// Approximate kilometres per degree of latitude.
const KM_PER_DEG_LAT: f64 = 111.0;
/// Approximate kilometres per degree of longitude at mid latitudes.
const KM_PER_DEG_LON: f64 = 85.0;

const SIMULATED_MIN_MINUTES_PER_KM: f64 = 2.0;
const SIMULATED_MAX_MINUTES_PER_KM: f64 = 5.0;

/// Planar distance approximation, rounded to two decimals.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let dlat = (to.lat - from.lat) * KM_PER_DEG_LAT;
    let dlon = (to.lon - from.lon) * KM_PER_DEG_LON;
    let distance = (dlat * dlat + dlon * dlon).sqrt();
    (distance * 100.0).round() / 100.0
}

/// Estimates travel from the patient to a hospital.
pub trait TrafficEstimator: Send + Sync {
    fn estimate(&self, from: Coordinates, hospital: &Hospital) -> TrafficAnalysis;
}

/// Travel time drawn uniformly between 2 and 5 minutes per km.
pub struct SimulatedTraffic {
    rng: Mutex<StdRng>,
}

impl SimulatedTraffic {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TrafficEstimator for SimulatedTraffic {
    fn estimate(&self, from: Coordinates, hospital: &Hospital) -> TrafficAnalysis {
        let distance = distance_km(from, hospital.coordinates);
        let factor = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(SIMULATED_MIN_MINUTES_PER_KM..SIMULATED_MAX_MINUTES_PER_KM)
        };
        let analysis = TrafficAnalysis {
            travel_minutes: (distance * factor).floor() as u32,
            distance_km: distance,
        };
        tracing::info!(
            hospital = %hospital.name,
            distance_km = analysis.distance_km,
            travel_minutes = analysis.travel_minutes,
            "Analyzed traffic"
        );
        analysis
    }
}

/// Deterministic travel time at a constant pace.
#[derive(Debug, Clone, Copy)]
pub struct FixedSpeedTraffic {
    pub minutes_per_km: f64,
}

impl TrafficEstimator for FixedSpeedTraffic {
    fn estimate(&self, from: Coordinates, hospital: &Hospital) -> TrafficAnalysis {
        let distance = distance_km(from, hospital.coordinates);
        TrafficAnalysis {
            travel_minutes: (distance * self.minutes_per_km).floor() as u32,
            distance_km: distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital_at(lat: f64, lon: f64) -> Hospital {
        Hospital {
            id: "h".into(),
            name: "Test".into(),
            address: "1 Test Way".into(),
            contact_number: "+10000000000".into(),
            coordinates: Coordinates { lat, lon },
        }
    }

    #[test]
    fn same_point_is_zero_distance() {
        let p = Coordinates { lat: 34.05, lon: -118.24 };
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn default_patient_to_city_general() {
        let patient = Coordinates { lat: 34.0550, lon: -118.2450 };
        let city_general = Coordinates { lat: 34.0522, lon: -118.2437 };
        // dlat = -0.0028 * 111 = -0.3108; dlon = 0.0013 * 85 = 0.1105
        // sqrt(0.09659664 + 0.01221025) = 0.3298...
        assert_eq!(distance_km(patient, city_general), 0.33);
    }

    #[test]
    fn city_general_to_community_care() {
        let city_general = Coordinates { lat: 34.0522, lon: -118.2437 };
        let community_care = Coordinates { lat: 34.0600, lon: -118.2500 };
        // dlat = 0.0078 * 111 = 0.8658; dlon = -0.0063 * 85 = -0.5355
        // sqrt(0.74960964 + 0.28676025) = 1.0180...
        assert_eq!(distance_km(city_general, community_care), 1.02);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates { lat: 34.0550, lon: -118.2450 };
        let b = Coordinates { lat: 34.0600, lon: -118.2500 };
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn fixed_speed_floors_minutes() {
        let traffic = FixedSpeedTraffic { minutes_per_km: 3.0 };
        // 0.1 degrees of latitude = 11.1 km → 33.3 min → 33
        let t = traffic.estimate(Coordinates { lat: 0.0, lon: 0.0 }, &hospital_at(0.1, 0.0));
        assert_eq!(t.distance_km, 11.1);
        assert_eq!(t.travel_minutes, 33);
    }

    #[test]
    fn simulated_travel_within_pace_bounds() {
        let traffic = SimulatedTraffic::new(5);
        let from = Coordinates { lat: 0.0, lon: 0.0 };
        let h = hospital_at(0.1, 0.0);
        for _ in 0..100 {
            let t = traffic.estimate(from, &h);
            assert!(t.travel_minutes >= 22 && t.travel_minutes < 56, "{}", t.travel_minutes);
        }
    }
}
