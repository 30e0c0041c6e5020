use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::mail::ContactSubmission;

/// Request DTO for the contact form.
///
/// Every field is optional at the serde layer so presence is checked in the
/// pipeline (after rate limiting) rather than by deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormDto {
    #[validate(length(max = 100, message = "First name must not exceed 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name must not exceed 100 characters"))]
    pub last_name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must not exceed 254 characters")
    )]
    pub email: Option<String>,

    #[validate(length(max = 30, message = "Phone must not exceed 30 characters"))]
    pub phone: Option<String>,

    #[validate(
        length(max = 5000, message = "Message must not exceed 5000 characters"),
        custom(function = crate::shared::validation::validate_link_count)
    )]
    pub message: Option<String>,

    /// Server-verified reCAPTCHA v3 action token
    pub recaptcha_token: Option<String>,

    /// Honeypot. Hidden from human users client-side; a non-empty value
    /// marks an automated submission.
    pub website: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl ContactFormDto {
    /// All five user-visible fields are required; the original form reports
    /// a single collective error
    pub fn has_required_fields(&self) -> bool {
        present(&self.first_name)
            && present(&self.last_name)
            && present(&self.email)
            && present(&self.phone)
            && present(&self.message)
    }

    pub fn honeypot_triggered(&self) -> bool {
        present(&self.website)
    }

    /// Consume the DTO after presence checking
    pub fn into_submission(self) -> ContactSubmission {
        ContactSubmission {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_dto() -> ContactFormDto {
        ContactFormDto {
            first_name: Some("Jamie".to_string()),
            last_name: Some("Carter".to_string()),
            email: Some("jamie@example.com".to_string()),
            phone: Some("07700 900123".to_string()),
            message: Some("Shoulder pain after climbing.".to_string()),
            recaptcha_token: Some("token".to_string()),
            website: None,
        }
    }

    #[test]
    fn test_required_fields() {
        assert!(valid_dto().has_required_fields());

        let mut dto = valid_dto();
        dto.phone = None;
        assert!(!dto.has_required_fields());

        // Whitespace-only counts as missing
        let mut dto = valid_dto();
        dto.message = Some("   ".to_string());
        assert!(!dto.has_required_fields());
    }

    #[test]
    fn test_honeypot() {
        assert!(!valid_dto().honeypot_triggered());

        let mut dto = valid_dto();
        dto.website = Some("https://spam.example".to_string());
        assert!(dto.honeypot_triggered());

        // Empty honeypot value is what legitimate clients submit
        let mut dto = valid_dto();
        dto.website = Some(String::new());
        assert!(!dto.honeypot_triggered());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut dto = valid_dto();
        dto.email = Some("not-an-email".to_string());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_too_many_links_rejected() {
        let mut dto = valid_dto();
        dto.message = Some(
            "https://a.com https://b.com https://c.com https://d.com".to_string(),
        );
        let err = dto.validate().unwrap_err();
        assert!(err.to_string().contains("too many links"));
    }

    #[test]
    fn test_three_links_tolerated() {
        let mut dto = valid_dto();
        dto.message = Some("https://a.com https://b.com https://c.com".to_string());
        assert!(dto.validate().is_ok());
    }
}
