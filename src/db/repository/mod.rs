//! Repository layer: entity-scoped database operations.
//!
//! Timestamps are stored as local naive datetimes in `DATETIME_FORMAT`;
//! ids are stored as hyphenated UUID strings.

mod incident;
mod patient;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::DatabaseError;

pub use incident::*;
pub use patient::*;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| DatabaseError::InvalidRow(format!("bad timestamp {s:?}: {e}")))
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::InvalidRow(e.to_string()))
}
