use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::hospital::{rank_hospitals, RankedHospital};
use crate::models::Coordinates;

#[derive(Serialize)]
pub struct RankingResponse {
    pub patient: Coordinates,
    pub hospitals: Vec<RankedHospital>,
}

/// `GET /api/hospitals/ranking`: accepting hospitals for the configured
/// patient, best first.
pub async fn ranking(State(ctx): State<ApiContext>) -> Json<RankingResponse> {
    let patient = ctx.config.patient.coordinates;
    let hospitals = rank_hospitals(
        patient,
        &ctx.config.hospitals,
        ctx.services.availability.as_ref(),
        ctx.services.traffic.as_ref(),
        &ctx.config.weights,
    );
    Json(RankingResponse { patient, hospitals })
}
