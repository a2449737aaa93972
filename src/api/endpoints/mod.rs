//! API endpoint handlers. Each module maps to one resource.

pub mod emergency;
pub mod health;
pub mod hospitals;
pub mod incidents;
pub mod triage;
