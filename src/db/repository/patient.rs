use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::Gender;
use crate::models::{NewPatient, Patient};

/// Insert a patient under the owning clinician. Returns the new row id.
/// `blacklisted` takes its schema default.
pub fn insert_patient(
    conn: &Connection,
    user_id: i64,
    patient: &NewPatient,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients
             (user_id, name, gender, age, medical_history, allergies,
              family_history, lifestyle, blood_group)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            patient.name,
            patient.gender.as_str(),
            patient.age,
            patient.medical_history,
            patient.allergies,
            patient.family_history,
            patient.lifestyle,
            patient.blood_group,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch one patient, scoped to the owning clinician.
///
/// The ownership check lives in the query itself: a patient that exists
/// under another account and a patient that does not exist at all are the
/// same `None`, so callers cannot tell the two apart.
pub fn get_patient_for_user(
    conn: &Connection,
    patient_id: i64,
    user_id: i64,
) -> Result<Option<Patient>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, user_id, name, gender, age, medical_history, allergies,
                family_history, lifestyle, blood_group, blacklisted
         FROM patients WHERE id = ?1 AND user_id = ?2",
        params![patient_id, user_id],
        row_to_patient_row,
    );

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List all patients owned by the clinician, oldest first.
pub fn list_patients_for_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, gender, age, medical_history, allergies,
                family_history, lifestyle, blood_group, blacklisted
         FROM patients WHERE user_id = ?1 ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![user_id], row_to_patient_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

struct PatientRow {
    id: i64,
    user_id: i64,
    name: String,
    gender: String,
    age: Option<i64>,
    medical_history: Option<String>,
    allergies: Option<String>,
    family_history: Option<String>,
    lifestyle: Option<String>,
    blood_group: Option<String>,
    blacklisted: i64,
}

fn row_to_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        gender: row.get(3)?,
        age: row.get(4)?,
        medical_history: row.get(5)?,
        allergies: row.get(6)?,
        family_history: row.get(7)?,
        lifestyle: row.get(8)?,
        blood_group: row.get(9)?,
        blacklisted: row.get(10)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        user_id: row.user_id,
        name: row.name,
        gender: Gender::from_str(&row.gender)?,
        age: row.age,
        medical_history: row.medical_history.unwrap_or_default(),
        allergies: row.allergies.unwrap_or_default(),
        family_history: row.family_history.unwrap_or_default(),
        lifestyle: row.lifestyle.unwrap_or_default(),
        blood_group: row.blood_group.unwrap_or_default(),
        blacklisted: row.blacklisted != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::user::insert_user;
    use crate::db::sqlite::open_memory_database;

    fn sample_patient(name: &str) -> NewPatient {
        NewPatient {
            name: name.to_string(),
            gender: Gender::Male,
            age: Some(30),
            medical_history: "Hypertension".to_string(),
            allergies: String::new(),
            family_history: "Diabetes (father)".to_string(),
            lifestyle: "Non-smoker".to_string(),
            blood_group: "O+".to_string(),
        }
    }

    fn two_doctors(conn: &Connection) -> (i64, i64) {
        let a = insert_user(conn, "Dr A", "dra", "h1").unwrap();
        let b = insert_user(conn, "Dr B", "drb", "h2").unwrap();
        (a, b)
    }

    #[test]
    fn insert_and_fetch_patient() {
        let conn = open_memory_database().unwrap();
        let (dra, _) = two_doctors(&conn);

        let id = insert_patient(&conn, dra, &sample_patient("John")).unwrap();
        let patient = get_patient_for_user(&conn, id, dra).unwrap().unwrap();

        assert_eq!(patient.name, "John");
        assert_eq!(patient.gender, Gender::Male);
        assert_eq!(patient.age, Some(30));
        assert_eq!(patient.allergies, "");
        assert!(patient.blacklisted, "schema default applies");
    }

    #[test]
    fn other_doctors_patient_is_invisible() {
        let conn = open_memory_database().unwrap();
        let (dra, drb) = two_doctors(&conn);

        let id = insert_patient(&conn, dra, &sample_patient("John")).unwrap();

        // Existing-but-not-owned and nonexistent both come back as None.
        assert!(get_patient_for_user(&conn, id, drb).unwrap().is_none());
        assert!(get_patient_for_user(&conn, 9999, drb).unwrap().is_none());
    }

    #[test]
    fn list_scopes_to_owner_in_insertion_order() {
        let conn = open_memory_database().unwrap();
        let (dra, drb) = two_doctors(&conn);

        insert_patient(&conn, dra, &sample_patient("John")).unwrap();
        insert_patient(&conn, dra, &sample_patient("Jane")).unwrap();
        insert_patient(&conn, drb, &sample_patient("Mallory")).unwrap();

        let patients = list_patients_for_user(&conn, dra).unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].name, "John");
        assert_eq!(patients[1].name, "Jane");
    }

    #[test]
    fn null_text_columns_read_as_empty() {
        let conn = open_memory_database().unwrap();
        let (dra, _) = two_doctors(&conn);

        conn.execute(
            "INSERT INTO patients (user_id, name, gender) VALUES (?1, 'Bare', 'Other')",
            params![dra],
        )
        .unwrap();
        let id = conn.last_insert_rowid();

        let patient = get_patient_for_user(&conn, id, dra).unwrap().unwrap();
        assert_eq!(patient.medical_history, "");
        assert_eq!(patient.blood_group, "");
        assert_eq!(patient.age, None);
    }
}
