//! `POST /api/triage`: assess a symptom description against the
//! configured patient's history.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::triage::TriageAssessment;

#[derive(Deserialize)]
pub struct TriageRequest {
    pub description: String,
}

pub async fn assess(
    State(ctx): State<ApiContext>,
    Json(request): Json<TriageRequest>,
) -> Result<Json<TriageAssessment>, ApiError> {
    let assessment = ctx
        .services
        .analyzer
        .analyze(&request.description, &ctx.config.patient.medical_history);
    Ok(Json(assessment))
}
