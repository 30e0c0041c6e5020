use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::modules::mail::{ContactSubmission, Mailer};
use crate::modules::rate_limit::{ContactAdmission, RateLimiter};
use crate::modules::recaptcha::TokenVerifier;

/// Service composing admission control, bot verification and notification
/// dispatch for the contact form
pub struct ContactService {
    limiter: Arc<RateLimiter>,
    verifier: Arc<dyn TokenVerifier>,
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    pub fn new(
        limiter: Arc<RateLimiter>,
        verifier: Arc<dyn TokenVerifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            limiter,
            verifier,
            mailer,
        }
    }

    /// Run both rate-limit tiers for `identifier`; a rejection surfaces as
    /// `AppError::RateLimited`
    pub fn admit(&self, identifier: &str) -> Result<ContactAdmission> {
        self.limiter.admit(identifier)
    }

    pub async fn verify_token(&self, token: &str) -> bool {
        self.verifier.verify(token).await
    }

    /// Send the operator notification and the submitter confirmation.
    ///
    /// The operator notification is the primary business effect, so its
    /// failure fails the request. The confirmation is a courtesy: a failure
    /// is logged and swallowed.
    pub async fn dispatch(&self, submission: &ContactSubmission) -> Result<()> {
        self.mailer
            .send_contact_notification(submission)
            .await
            .map_err(|e| {
                tracing::error!("Contact notification email failed: {}", e);
                AppError::Dispatch("Failed to send message. Please try again later.".to_string())
            })?;

        if let Err(e) = self.mailer.send_contact_confirmation(submission).await {
            tracing::warn!("Contact confirmation email failed: {}", e);
        }

        Ok(())
    }
}
