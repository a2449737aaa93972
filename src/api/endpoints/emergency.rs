//! `POST /api/emergency`: run the emergency protocol for a reported
//! transcript and/or sensor trigger, then record the incident.
//!
//! The protocol blocks on notification delivery, so it runs on the
//! blocking pool. The database lock is taken only to record the result.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::{get_patient, record_incident};
use crate::detection::{FixedSensor, ScriptedVoice};
use crate::protocol::{EmergencyProtocol, ProtocolReport};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct EmergencyRequest {
    pub transcript: Option<String>,
    pub sensor_triggered: bool,
    /// Stored patient to run for; the configured patient when absent.
    pub patient_id: Option<Uuid>,
}

pub async fn trigger(
    State(ctx): State<ApiContext>,
    Json(request): Json<EmergencyRequest>,
) -> Result<Json<ProtocolReport>, ApiError> {
    let report = tokio::task::spawn_blocking(move || run_protocol(&ctx, request)).await??;
    Ok(Json(report))
}

fn run_protocol(ctx: &ApiContext, request: EmergencyRequest) -> Result<ProtocolReport, ApiError> {
    let patient = match request.patient_id {
        Some(id) => {
            let conn = ctx.lock_db()?;
            let stored = get_patient(&conn, &id)?;
            stored.ok_or_else(|| ApiError::NotFound(format!("Patient {id} not found")))?
        }
        None => ctx.config.patient.clone(),
    };

    let voice = ScriptedVoice::new(request.transcript.unwrap_or_default());
    let sensor = FixedSensor(request.sensor_triggered);
    let protocol = EmergencyProtocol::new(&ctx.config, &ctx.services);
    let report = protocol.execute(&patient, &voice, &sensor)?;

    let mut conn = ctx.lock_db()?;
    record_incident(&mut conn, &report.incident, &report.notifications)?;
    Ok(report)
}
