//! Notification dispatch over SMTP
//!
//! Each accepted submission produces two emails: an operator-facing
//! notification with every submitted field (reply-to set to the submitter so
//! the clinic can respond directly) and a submitter-facing confirmation.
//! The caller decides fatality: the notification is the primary business
//! effect, the confirmation is a courtesy.

mod mailer;
mod templates;

use serde::Serialize;
use thiserror::Error;

pub use mailer::{Mailer, SmtpMailer};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to render email template: {0}")]
    Template(String),

    #[error("Invalid mailbox address: {0}")]
    Address(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Checked contact-form payload handed to the mailer
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Checked new-patient payload handed to the mailer
#[derive(Debug, Clone, Serialize)]
pub struct NewPatientSubmission {
    pub name: String,
    pub date_of_birth: String,
    pub contact_number: String,
    pub contact_email: String,
    pub address: String,
    pub occupation: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub gp_surgery: String,
    pub gp_surgery_contact: String,
    pub consent_treatment: bool,

    // Medical history flags
    pub heart_disease: bool,
    pub faint_dizziness: bool,
    pub hypertension: bool,
    pub diabetes: bool,
    pub pacemaker: bool,
    pub osteoporosis: bool,
    pub epilepsy: bool,
    pub asthma: bool,
    pub pregnant: bool,
    pub smoker: bool,
    pub cancer: bool,
    pub surgeries: bool,
    pub medications: bool,
    pub bleeding_disorders: bool,

    // Optional free text
    pub current_medication: Option<String>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub previous_surgeries: Option<String>,
}
