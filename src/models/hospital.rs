use serde::{Deserialize, Serialize};

use super::enums::HospitalStatus;
use super::patient::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HospitalAvailability {
    pub status: HospitalStatus,
    pub wait_minutes: u32,
}

impl HospitalAvailability {
    pub fn accepting(wait_minutes: u32) -> Self {
        Self { status: HospitalStatus::Accepting, wait_minutes }
    }

    pub fn diverting() -> Self {
        Self { status: HospitalStatus::Diverting, wait_minutes: 0 }
    }

    pub fn is_available(&self) -> bool {
        self.status == HospitalStatus::Accepting
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficAnalysis {
    pub travel_minutes: u32,
    pub distance_km: f64,
}
