use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::modules::mail::{Mailer, NewPatientSubmission};

/// Service dispatching the new-patient intake emails.
///
/// The intake endpoint carries no admission control or bot verification;
/// patients fill this form once, typically on request from the clinic.
pub struct IntakeService {
    mailer: Arc<dyn Mailer>,
}

impl IntakeService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Send the operator notification and the patient confirmation. As with
    /// the contact form, only the notification failure fails the request.
    pub async fn dispatch(&self, submission: &NewPatientSubmission) -> Result<()> {
        self.mailer
            .send_intake_notification(submission)
            .await
            .map_err(|e| {
                tracing::error!("New patient notification email failed: {}", e);
                AppError::Dispatch("Failed to submit form. Please try again later.".to_string())
            })?;

        if let Err(e) = self.mailer.send_intake_confirmation(submission).await {
            tracing::warn!("New patient confirmation email failed: {}", e);
        }

        Ok(())
    }
}
