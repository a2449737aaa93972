//! Incident log endpoints.
//!
//! `GET /api/incidents`: recent incidents, newest first.
//! `GET /api/incidents/:id`: one incident with its notifications.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::{get_incident, get_notifications_for_incident, list_recent_incidents};
use crate::models::{Incident, NotificationRecord};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 200;

#[derive(Deserialize)]
pub struct IncidentsQuery {
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct IncidentsResponse {
    pub incidents: Vec<Incident>,
}

#[derive(Serialize)]
pub struct IncidentDetail {
    pub incident: Incident,
    pub notifications: Vec<NotificationRecord>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<IncidentsQuery>,
) -> Result<Json<IncidentsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let conn = ctx.lock_db()?;
    let incidents = list_recent_incidents(&conn, limit)?;
    Ok(Json(IncidentsResponse { incidents }))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<IncidentDetail>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid incident ID".into()))?;

    let conn = ctx.lock_db()?;
    let incident = get_incident(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("Incident {id} not found")))?;
    let notifications = get_notifications_for_incident(&conn, &id)?;

    Ok(Json(IncidentDetail { incident, notifications }))
}
