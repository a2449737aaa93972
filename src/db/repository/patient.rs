use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Coordinates, MedicalHistory, PatientProfile};

/// Insert or replace a patient profile.
pub fn save_patient(conn: &Connection, patient: &PatientProfile) -> Result<(), DatabaseError> {
    let history_json = serde_json::to_string(&patient.medical_history)?;

    conn.execute(
        "INSERT OR REPLACE INTO patients
         (id, name, age, blood_type, address, lat, lon, medical_history_json, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.age.map(|a| a as i64),
            patient.blood_type,
            patient.address,
            patient.coordinates.lat,
            patient.coordinates.lon,
            history_json,
            format_datetime(&Local::now().naive_local()),
        ],
    )?;
    Ok(())
}

type PatientRow = (String, String, Option<i64>, Option<String>, String, f64, f64, String);

fn read_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn patient_from_row(row: PatientRow) -> Result<PatientProfile, DatabaseError> {
    let (id, name, age, blood_type, address, lat, lon, history_json) = row;
    let medical_history: MedicalHistory = serde_json::from_str(&history_json)?;

    Ok(PatientProfile {
        id: parse_uuid(&id)?,
        name,
        age: age.and_then(|a| u32::try_from(a).ok()),
        blood_type,
        address,
        coordinates: Coordinates { lat, lon },
        medical_history,
    })
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<PatientProfile>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, age, blood_type, address, lat, lon, medical_history_json
             FROM patients WHERE id = ?1",
            params![id.to_string()],
            read_patient_row,
        )
        .optional()?;

    row.map(patient_from_row).transpose()
}

pub fn list_patients(conn: &Connection) -> Result<Vec<PatientProfile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, blood_type, address, lat, lon, medical_history_json
         FROM patients ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], read_patient_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn make_patient(name: &str) -> PatientProfile {
        PatientProfile {
            id: Uuid::new_v4(),
            name: name.into(),
            age: Some(54),
            blood_type: Some("A-".into()),
            ..PatientProfile::default()
        }
    }

    #[test]
    fn save_and_get_patient() {
        let conn = open_memory_database().unwrap();
        let patient = make_patient("Jordan Lee");
        save_patient(&conn, &patient).unwrap();

        let loaded = get_patient(&conn, &patient.id).unwrap().unwrap();
        assert_eq!(loaded, patient);
        assert_eq!(loaded.medical_history.allergies, vec!["Penicillin".to_string()]);
    }

    #[test]
    fn save_patient_upserts() {
        let conn = open_memory_database().unwrap();
        let mut patient = make_patient("Jordan Lee");
        save_patient(&conn, &patient).unwrap();

        patient.address = "9 Elm Rd".into();
        patient.medical_history.conditions.push("Hypertension".into());
        save_patient(&conn, &patient).unwrap();

        let all = list_patients(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].address, "9 Elm Rd");
        assert_eq!(all[0].medical_history.conditions.len(), 2);
    }

    #[test]
    fn list_patients_sorted_by_name() {
        let conn = open_memory_database().unwrap();
        save_patient(&conn, &make_patient("Zoe")).unwrap();
        save_patient(&conn, &make_patient("Amir")).unwrap();

        let names: Vec<String> = list_patients(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Amir".to_string(), "Zoe".to_string()]);
    }

    #[test]
    fn unknown_patient_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_patient(&conn, &Uuid::new_v4()).unwrap().is_none());
    }
}
