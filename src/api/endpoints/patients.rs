//! Patient record endpoints.
//!
//! `POST /api/patients` — create a patient under the logged-in clinician
//! `GET /api/patients` — list own patients
//! `GET /api/patients/:id` — one own patient

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::db::repository;
use crate::models::enums::Gender;
use crate::models::{NewPatient, Patient};

#[derive(Deserialize)]
pub struct AddPatientRequest {
    pub name: String,
    pub gender: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub family_history: String,
    #[serde(default)]
    pub lifestyle: String,
    #[serde(default)]
    pub blood_group: String,
}

#[derive(Serialize)]
pub struct AddPatientResponse {
    pub id: i64,
}

/// `POST /api/patients` — record a new patient.
pub async fn add(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<AddPatientRequest>,
) -> Result<Json<AddPatientResponse>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Patient name is required".into()));
    }
    let gender = Gender::from_str(&req.gender)
        .map_err(|_| ApiError::BadRequest("Gender must be Male, Female or Other".into()))?;

    let patient = NewPatient {
        name: name.to_string(),
        gender,
        age: req.age,
        medical_history: req.medical_history,
        allergies: req.allergies,
        family_history: req.family_history,
        lifestyle: req.lifestyle,
        blood_group: req.blood_group,
    };

    let conn = ctx.open_db()?;
    let id = repository::insert_patient(&conn, user.user_id, &patient)?;

    tracing::info!(patient_id = id, user_id = user.user_id, "Patient recorded");
    Ok(Json(AddPatientResponse { id }))
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub patients: Vec<Patient>,
}

/// `GET /api/patients` — list the clinician's own patients.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let patients = repository::list_patients_for_user(&conn, user.user_id)?;
    Ok(Json(PatientListResponse { patients }))
}

/// `GET /api/patients/:id` — one patient, ownership enforced.
///
/// Absent and not-owned are the same 404; the repository query cannot
/// tell them apart and neither can the client.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = repository::get_patient_for_user(&conn, patient_id, user.user_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    Ok(Json(patient))
}
