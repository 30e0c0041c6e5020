//! Email body rendering using Jinja2 syntax
//!
//! Templates are embedded at compile time and registered in a global
//! environment on first use.

use std::sync::OnceLock;

use minijinja::{context, Environment, Value};

use crate::modules::mail::{ContactSubmission, MailError, NewPatientSubmission};

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATES: [(&str, &str); 4] = [
    (
        "contact_notification.html",
        include_str!("../../../templates/email/contact_notification.html.jinja"),
    ),
    (
        "contact_confirmation.html",
        include_str!("../../../templates/email/contact_confirmation.html.jinja"),
    ),
    (
        "new_patient_notification.html",
        include_str!("../../../templates/email/new_patient_notification.html.jinja"),
    ),
    (
        "new_patient_confirmation.html",
        include_str!("../../../templates/email/new_patient_confirmation.html.jinja"),
    ),
];

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_filter("yesno", |flag: bool| if flag { "Yes" } else { "No" });
        for (name, source) in TEMPLATES {
            // Embedded templates are validated by the template tests;
            // a broken one is a programming error
            env.add_template(name, source)
                .expect("invalid embedded email template");
        }
        env
    })
}

fn render(name: &str, ctx: Value) -> Result<String, MailError> {
    environment()
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|e| MailError::Template(e.to_string()))
}

pub fn contact_notification(
    form: &ContactSubmission,
    submitted_at: &str,
) -> Result<String, MailError> {
    render(
        "contact_notification.html",
        context! { form => form, submitted_at => submitted_at },
    )
}

pub fn contact_confirmation(form: &ContactSubmission) -> Result<String, MailError> {
    render("contact_confirmation.html", context! { form => form })
}

pub fn new_patient_notification(
    form: &NewPatientSubmission,
    submitted_at: &str,
) -> Result<String, MailError> {
    render(
        "new_patient_notification.html",
        context! { form => form, submitted_at => submitted_at },
    )
}

pub fn new_patient_confirmation(form: &NewPatientSubmission) -> Result<String, MailError> {
    render("new_patient_confirmation.html", context! { form => form })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_form() -> ContactSubmission {
        ContactSubmission {
            first_name: "Jamie".to_string(),
            last_name: "Carter".to_string(),
            email: "jamie@example.com".to_string(),
            phone: "07700 900123".to_string(),
            message: "Shoulder pain after climbing.\nWeekends preferred.".to_string(),
        }
    }

    fn new_patient_form() -> NewPatientSubmission {
        NewPatientSubmission {
            name: "Jamie Carter".to_string(),
            date_of_birth: "1990-04-12".to_string(),
            contact_number: "07700 900123".to_string(),
            contact_email: "jamie@example.com".to_string(),
            address: "1 Castlegate, Grantham".to_string(),
            occupation: "Software developer".to_string(),
            emergency_contact_name: "Alex Carter".to_string(),
            emergency_contact_number: "07700 900456".to_string(),
            gp_surgery: "Castlegate Surgery".to_string(),
            gp_surgery_contact: "01476 000000".to_string(),
            consent_treatment: true,
            heart_disease: false,
            faint_dizziness: false,
            hypertension: true,
            diabetes: false,
            pacemaker: false,
            osteoporosis: false,
            epilepsy: false,
            asthma: true,
            pregnant: false,
            smoker: false,
            cancer: false,
            surgeries: false,
            medications: true,
            bleeding_disorders: false,
            current_medication: Some("Salbutamol inhaler".to_string()),
            allergies: None,
            medical_conditions: None,
            previous_surgeries: None,
        }
    }

    #[test]
    fn test_contact_notification_lists_all_fields() {
        let html = contact_notification(&contact_form(), "1 June 2026 09:30 UTC").unwrap();
        assert!(html.contains("Jamie Carter"));
        assert!(html.contains("jamie@example.com"));
        assert!(html.contains("07700 900123"));
        assert!(html.contains("Shoulder pain after climbing."));
        assert!(html.contains("1 June 2026 09:30 UTC"));
    }

    #[test]
    fn test_contact_confirmation_addresses_submitter() {
        let html = contact_confirmation(&contact_form()).unwrap();
        assert!(html.contains("Dear Jamie"));
        assert!(html.contains("hello@kstherapyclinic.com"));
    }

    #[test]
    fn test_new_patient_notification_renders_flags_as_yes_no() {
        let html = new_patient_notification(&new_patient_form(), "1 June 2026 09:30 UTC").unwrap();
        assert!(html.contains("Hypertension"));
        assert!(html.contains("Yes"));
        assert!(html.contains("No"));
        assert!(html.contains("Castlegate Surgery"));
        assert!(html.contains("Salbutamol inhaler"));
        // Absent optional free text falls back to a placeholder
        assert!(html.contains("None specified"));
    }

    #[test]
    fn test_new_patient_confirmation_renders() {
        let html = new_patient_confirmation(&new_patient_form()).unwrap();
        assert!(html.contains("Dear Jamie Carter"));
    }

    #[test]
    fn test_message_html_is_escaped() {
        let mut form = contact_form();
        form.message = "<script>alert(1)</script>".to_string();
        let html = contact_notification(&form, "now").unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
