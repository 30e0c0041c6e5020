use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::mail::NewPatientSubmission;

/// Request DTO for the new patient intake form.
///
/// Required fields are optional at the serde layer; presence is reported
/// per field rather than collectively, because the form is long and the
/// submitter needs to know which answer is missing. The medical history
/// checkboxes default to `false` when the client omits them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPatientFormDto {
    #[validate(length(max = 200, message = "Name must not exceed 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 30, message = "Date of birth must not exceed 30 characters"))]
    pub date_of_birth: Option<String>,

    #[validate(length(max = 30, message = "Contact number must not exceed 30 characters"))]
    pub contact_number: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must not exceed 254 characters")
    )]
    pub contact_email: Option<String>,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 200, message = "Occupation must not exceed 200 characters"))]
    pub occupation: Option<String>,

    #[validate(length(max = 200, message = "Emergency contact name must not exceed 200 characters"))]
    pub emergency_contact_name: Option<String>,

    #[validate(length(max = 30, message = "Emergency contact number must not exceed 30 characters"))]
    pub emergency_contact_number: Option<String>,

    #[validate(length(max = 200, message = "GP surgery must not exceed 200 characters"))]
    pub gp_surgery: Option<String>,

    #[validate(length(max = 200, message = "GP surgery contact must not exceed 200 characters"))]
    pub gp_surgery_contact: Option<String>,

    /// Consent to assessment and treatment; must be ticked
    pub consent_treatment: Option<bool>,

    // Medical history checkboxes; an omitted box reads as "no"
    #[serde(default)]
    pub heart_disease: bool,
    #[serde(default)]
    pub faint_dizziness: bool,
    #[serde(default)]
    pub hypertension: bool,
    #[serde(default)]
    pub diabetes: bool,
    #[serde(default)]
    pub pacemaker: bool,
    #[serde(default)]
    pub osteoporosis: bool,
    #[serde(default)]
    pub epilepsy: bool,
    #[serde(default)]
    pub asthma: bool,
    #[serde(default)]
    pub pregnant: bool,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub cancer: bool,
    #[serde(default)]
    pub surgeries: bool,
    #[serde(default)]
    pub medications: bool,
    #[serde(default)]
    pub bleeding_disorders: bool,

    // Free-text elaborations, all optional
    #[validate(length(max = 2000, message = "Current medication must not exceed 2000 characters"))]
    pub current_medication: Option<String>,

    #[validate(length(max = 2000, message = "Allergies must not exceed 2000 characters"))]
    pub allergies: Option<String>,

    #[validate(length(max = 2000, message = "Medical conditions must not exceed 2000 characters"))]
    pub medical_conditions: Option<String>,

    #[validate(length(max = 2000, message = "Previous surgeries must not exceed 2000 characters"))]
    pub previous_surgeries: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl NewPatientFormDto {
    /// First missing required answer, as the client-facing field name.
    /// Consent counts as missing unless explicitly ticked.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if !present(&self.name) {
            return Some("name");
        }
        if !present(&self.date_of_birth) {
            return Some("dateOfBirth");
        }
        if !present(&self.contact_number) {
            return Some("contactNumber");
        }
        if !present(&self.contact_email) {
            return Some("contactEmail");
        }
        if !present(&self.address) {
            return Some("address");
        }
        if !present(&self.occupation) {
            return Some("occupation");
        }
        if !present(&self.emergency_contact_name) {
            return Some("emergencyContactName");
        }
        if !present(&self.emergency_contact_number) {
            return Some("emergencyContactNumber");
        }
        if !present(&self.gp_surgery) {
            return Some("gpSurgery");
        }
        if !present(&self.gp_surgery_contact) {
            return Some("gpSurgeryContact");
        }
        if self.consent_treatment != Some(true) {
            return Some("consentTreatment");
        }
        None
    }

    /// Consume the DTO after presence checking
    pub fn into_submission(self) -> NewPatientSubmission {
        NewPatientSubmission {
            name: self.name.unwrap_or_default(),
            date_of_birth: self.date_of_birth.unwrap_or_default(),
            contact_number: self.contact_number.unwrap_or_default(),
            contact_email: self.contact_email.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            occupation: self.occupation.unwrap_or_default(),
            emergency_contact_name: self.emergency_contact_name.unwrap_or_default(),
            emergency_contact_number: self.emergency_contact_number.unwrap_or_default(),
            gp_surgery: self.gp_surgery.unwrap_or_default(),
            gp_surgery_contact: self.gp_surgery_contact.unwrap_or_default(),
            consent_treatment: self.consent_treatment.unwrap_or_default(),
            heart_disease: self.heart_disease,
            faint_dizziness: self.faint_dizziness,
            hypertension: self.hypertension,
            diabetes: self.diabetes,
            pacemaker: self.pacemaker,
            osteoporosis: self.osteoporosis,
            epilepsy: self.epilepsy,
            asthma: self.asthma,
            pregnant: self.pregnant,
            smoker: self.smoker,
            cancer: self.cancer,
            surgeries: self.surgeries,
            medications: self.medications,
            bleeding_disorders: self.bleeding_disorders,
            current_medication: blank_to_none(self.current_medication),
            allergies: blank_to_none(self.allergies),
            medical_conditions: blank_to_none(self.medical_conditions),
            previous_surgeries: blank_to_none(self.previous_surgeries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> NewPatientFormDto {
        serde_json::from_value(serde_json::json!({
            "name": "Alex Morgan",
            "dateOfBirth": "1990-03-14",
            "contactNumber": "07700 900456",
            "contactEmail": "alex@example.com",
            "address": "12 High Street, Grantham",
            "occupation": "Teacher",
            "emergencyContactName": "Sam Morgan",
            "emergencyContactNumber": "07700 900789",
            "gpSurgery": "Castlegate Surgery",
            "gpSurgeryContact": "01476 000000",
            "consentTreatment": true,
            "asthma": true,
            "currentMedication": "Salbutamol inhaler"
        }))
        .unwrap()
    }

    #[test]
    fn test_complete_form_has_no_missing_field() {
        assert_eq!(valid_dto().missing_required_field(), None);
    }

    #[test]
    fn test_first_missing_field_reported_by_client_name() {
        let mut dto = valid_dto();
        dto.emergency_contact_name = Some("  ".to_string());
        assert_eq!(dto.missing_required_field(), Some("emergencyContactName"));
    }

    #[test]
    fn test_consent_must_be_explicitly_true() {
        let mut dto = valid_dto();
        dto.consent_treatment = Some(false);
        assert_eq!(dto.missing_required_field(), Some("consentTreatment"));

        dto.consent_treatment = None;
        assert_eq!(dto.missing_required_field(), Some("consentTreatment"));
    }

    #[test]
    fn test_omitted_checkboxes_default_to_false() {
        let dto = valid_dto();
        assert!(dto.asthma);
        assert!(!dto.diabetes);
        assert!(!dto.pregnant);
    }

    #[test]
    fn test_blank_free_text_becomes_none() {
        let mut dto = valid_dto();
        dto.allergies = Some("   ".to_string());
        let submission = dto.into_submission();
        assert_eq!(submission.allergies, None);
        assert_eq!(
            submission.current_medication.as_deref(),
            Some("Salbutamol inhaler")
        );
    }
}
