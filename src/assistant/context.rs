use crate::models::Patient;

/// Render a patient record into the fixed context block injected into the
/// assistant's system prompt.
///
/// Deterministic: same record, same text. Every field is rendered even
/// when empty — an unrecorded allergy line reads `Allergies: ` so the
/// model sees that the field exists and holds nothing, rather than the
/// field silently disappearing.
pub fn build_patient_context(patient: &Patient) -> String {
    let age = patient.age.map(|a| a.to_string()).unwrap_or_default();
    format!(
        "Patient Name: {}\n\
         Age: {}\n\
         Gender: {}\n\
         Blood Group: {}\n\
         Medical History: {}\n\
         Allergies: {}\n\
         Family History: {}\n\
         Lifestyle: {}",
        patient.name,
        age,
        patient.gender.as_str(),
        patient.blood_group,
        patient.medical_history,
        patient.allergies,
        patient.family_history,
        patient.lifestyle,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Gender;

    fn full_patient() -> Patient {
        Patient {
            id: 1,
            user_id: 1,
            name: "John".to_string(),
            gender: Gender::Male,
            age: Some(30),
            medical_history: "Hypertension".to_string(),
            allergies: "Penicillin".to_string(),
            family_history: "Diabetes (father)".to_string(),
            lifestyle: "Non-smoker".to_string(),
            blood_group: "O+".to_string(),
            blacklisted: true,
        }
    }

    #[test]
    fn renders_all_fields_in_fixed_order() {
        let block = build_patient_context(&full_patient());
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "Patient Name: John");
        assert_eq!(lines[1], "Age: 30");
        assert_eq!(lines[2], "Gender: Male");
        assert_eq!(lines[3], "Blood Group: O+");
        assert_eq!(lines[4], "Medical History: Hypertension");
        assert_eq!(lines[5], "Allergies: Penicillin");
        assert_eq!(lines[6], "Family History: Diabetes (father)");
        assert_eq!(lines[7], "Lifestyle: Non-smoker");
    }

    #[test]
    fn empty_fields_render_literally() {
        let mut patient = full_patient();
        patient.age = None;
        patient.allergies = String::new();
        patient.blood_group = String::new();

        let block = build_patient_context(&patient);
        assert!(block.contains("Age: \n"));
        assert!(block.contains("Allergies: \n"));
        assert!(block.contains("Blood Group: \n"));
        assert_eq!(block.lines().count(), 8, "no field is omitted");
    }

    #[test]
    fn deterministic_for_same_record() {
        let patient = full_patient();
        assert_eq!(build_patient_context(&patient), build_patient_context(&patient));
    }
}
