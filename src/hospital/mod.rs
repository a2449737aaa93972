//! Hospital matching: availability, travel time, and ranking.
//!
//! Live bed-status feeds and routing APIs are external. Both are traits
//! here, with seeded simulations and deterministic fixtures.

pub mod availability;
pub mod selection;
pub mod traffic;

pub use availability::{AvailabilityProvider, SimulatedAvailability, StaticAvailability};
pub use selection::{rank_hospitals, select_optimal_hospital, RankedHospital, SelectionWeights};
pub use traffic::{distance_km, FixedSpeedTraffic, SimulatedTraffic, TrafficEstimator};
