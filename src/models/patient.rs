use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// A patient record, owned exclusively by the clinician who created it.
///
/// Free-text clinical fields are stored as given; an empty string means
/// "recorded as empty", which the assistant context renders literally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub gender: Gender,
    pub age: Option<i64>,
    pub medical_history: String,
    pub allergies: String,
    pub family_history: String,
    pub lifestyle: String,
    pub blood_group: String,
    pub blacklisted: bool,
}

/// Fields supplied when creating a patient. Ownership and the
/// `blacklisted` default are filled in at insert time.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub gender: Gender,
    pub age: Option<i64>,
    pub medical_history: String,
    pub allergies: String,
    pub family_history: String,
    pub lifestyle: String,
    pub blood_group: String,
}
