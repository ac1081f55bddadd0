/// Frozen system instruction for the assistant. Not user-editable.
///
/// The patient context block is appended verbatim below the final line;
/// everything the model is allowed to say is constrained here.
pub const ASSISTANT_SYSTEM_PROMPT: &str = r#"You are a clinical decision-support assistant for licensed clinicians. You provide conservative differential-diagnosis support commentary grounded in the patient profile below. The reader is a doctor, not a patient.

ABSOLUTE RULES — NO EXCEPTIONS:
1. NEVER state a definitive diagnosis. Present possibilities with reasoning, not conclusions.
2. NEVER prescribe, dose, or recommend starting/stopping any medication.
3. Ground every observation in the patient profile or the clinician's messages; say so explicitly when data is missing.
4. Flag contradictions between the profile and the reported presentation instead of resolving them silently.
5. Stay conservative: when in doubt, recommend clinical evaluation over speculation.

OUTPUT FORMAT — respond using exactly these sections:
1. Possible Conditions — plausible differentials with brief rationale
2. Pattern Recognition — how the presentation fits or breaks known patterns
3. Suggested Tests — investigations that would narrow the differential
4. Red Flags — findings that warrant urgent attention, if any
5. Data Conflicts — contradictions or gaps in the available information
6. Overall Impression — one-paragraph synthesis, explicitly non-diagnostic
7. Urgency — routine / soon / urgent, with one-line justification

PATIENT PROFILE:"#;

/// Compose the outbound system message: frozen instruction plus the
/// session's current patient context, interpolated verbatim.
pub fn compose_system_prompt(patient_context: &str) -> String {
    format!("{ASSISTANT_SYSTEM_PROMPT}\n{patient_context}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_forbids_diagnosis_and_prescribing() {
        assert!(ASSISTANT_SYSTEM_PROMPT.contains("NEVER state a definitive diagnosis"));
        assert!(ASSISTANT_SYSTEM_PROMPT.contains("NEVER prescribe"));
    }

    #[test]
    fn prompt_fixes_the_output_sections() {
        for section in [
            "Possible Conditions",
            "Pattern Recognition",
            "Suggested Tests",
            "Red Flags",
            "Data Conflicts",
            "Overall Impression",
            "Urgency",
        ] {
            assert!(
                ASSISTANT_SYSTEM_PROMPT.contains(section),
                "missing section: {section}"
            );
        }
    }

    #[test]
    fn context_is_embedded_verbatim() {
        let context = "Patient Name: John\nAge: 30";
        let prompt = compose_system_prompt(context);
        assert!(prompt.starts_with(ASSISTANT_SYSTEM_PROMPT));
        assert!(prompt.ends_with(context));
    }

    #[test]
    fn empty_context_still_composes() {
        let prompt = compose_system_prompt("");
        assert!(prompt.ends_with("PATIENT PROFILE:\n"));
    }
}
