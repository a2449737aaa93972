use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_datetime, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::{Incident, NotificationRecord};

pub fn insert_incident(conn: &Connection, incident: &Incident) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO incidents
         (id, patient_id, started_at, completed_at, trigger_kind, transcript,
          severity, score, summary, outcome, hospital_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            incident.id.to_string(),
            incident.patient_id.to_string(),
            format_datetime(&incident.started_at),
            format_datetime(&incident.completed_at),
            incident.trigger.map(|t| t.as_str()),
            incident.transcript,
            incident.severity.as_str(),
            incident.score as i64,
            incident.summary,
            incident.outcome.as_str(),
            incident.hospital_id,
        ],
    )?;
    Ok(())
}

/// Insert a notification record. `seq` preserves send order within an incident.
pub fn insert_notification(
    conn: &Connection,
    seq: usize,
    record: &NotificationRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notifications
         (id, incident_id, seq, kind, recipient_name, recipient_phone,
          status, attempts, error, sent_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.id.to_string(),
            record.incident_id.to_string(),
            seq as i64,
            record.kind.as_str(),
            record.recipient_name,
            record.recipient_phone,
            record.status.as_str(),
            record.attempts as i64,
            record.error,
            format_datetime(&record.sent_at),
        ],
    )?;
    Ok(())
}

/// Persist an incident and all of its notifications atomically.
pub fn record_incident(
    conn: &mut Connection,
    incident: &Incident,
    notifications: &[NotificationRecord],
) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    insert_incident(&tx, incident)?;
    for (seq, record) in notifications.iter().enumerate() {
        insert_notification(&tx, seq, record)?;
    }
    tx.commit()?;
    tracing::debug!(
        incident_id = %incident.id,
        notifications = notifications.len(),
        "Incident recorded"
    );
    Ok(())
}

type IncidentRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    i64,
    String,
    String,
    Option<String>,
);

const INCIDENT_COLUMNS: &str = "id, patient_id, started_at, completed_at, trigger_kind, transcript,
                severity, score, summary, outcome, hospital_id";

fn read_incident_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<IncidentRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn incident_from_row(row: IncidentRow) -> Result<Incident, DatabaseError> {
    let (
        id,
        patient_id,
        started_at,
        completed_at,
        trigger,
        transcript,
        severity,
        score,
        summary,
        outcome,
        hospital_id,
    ) = row;

    Ok(Incident {
        id: parse_uuid(&id)?,
        patient_id: parse_uuid(&patient_id)?,
        started_at: parse_datetime(&started_at)?,
        completed_at: parse_datetime(&completed_at)?,
        trigger: trigger.as_deref().map(TriggerKind::from_str).transpose()?,
        transcript,
        severity: Severity::from_str(&severity)?,
        score: u8::try_from(score)
            .map_err(|_| DatabaseError::InvalidRow(format!("score out of range: {score}")))?,
        summary,
        outcome: OutcomeKind::from_str(&outcome)?,
        hospital_id,
    })
}

pub fn get_incident(conn: &Connection, id: &Uuid) -> Result<Option<Incident>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
            params![id.to_string()],
            read_incident_row,
        )
        .optional()?;

    row.map(incident_from_row).transpose()
}

/// Most recent incidents first.
pub fn list_recent_incidents(conn: &Connection, limit: u32) -> Result<Vec<Incident>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents
         ORDER BY started_at DESC, rowid DESC
         LIMIT ?1"
    ))?;

    let rows = stmt.query_map(params![limit as i64], read_incident_row)?;

    let mut incidents = Vec::new();
    for row in rows {
        incidents.push(incident_from_row(row?)?);
    }
    Ok(incidents)
}

/// Notifications for an incident, in send order.
pub fn get_notifications_for_incident(
    conn: &Connection,
    incident_id: &Uuid,
) -> Result<Vec<NotificationRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, recipient_name, recipient_phone, status, attempts, error, sent_at
         FROM notifications WHERE incident_id = ?1 ORDER BY seq ASC",
    )?;

    let rows = stmt.query_map(params![incident_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, i64>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, kind, recipient_name, recipient_phone, status, attempts, error, sent_at) = row?;
        records.push(NotificationRecord {
            id: parse_uuid(&id)?,
            incident_id: *incident_id,
            kind: NotificationKind::from_str(&kind)?,
            recipient_name,
            recipient_phone,
            status: DeliveryStatus::from_str(&status)?,
            attempts: attempts.max(0) as u32,
            error,
            sent_at: parse_datetime(&sent_at)?,
        });
    }
    Ok(records)
}

/// Count incidents with the given outcome.
pub fn count_incidents_by_outcome(
    conn: &Connection,
    outcome: OutcomeKind,
) -> Result<u32, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM incidents WHERE outcome = ?1",
        params![outcome.as_str()],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u32)
}

/// Incident count for every outcome, zeros included, in `OutcomeKind::ALL` order.
pub fn outcome_tally(conn: &Connection) -> Result<Vec<(OutcomeKind, u32)>, DatabaseError> {
    OutcomeKind::ALL
        .into_iter()
        .map(|outcome| Ok((outcome, count_incidents_by_outcome(conn, outcome)?)))
        .collect()
}
