use async_trait::async_trait;
use chrono::Utc;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::core::config::MailConfig;
use crate::modules::mail::{templates, ContactSubmission, MailError, NewPatientSubmission};

/// Seam for notification dispatch so endpoint tests can assert whether
/// emails were sent without a real SMTP transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Operator-facing notification; failure is fatal to the request
    async fn send_contact_notification(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), MailError>;

    /// Submitter-facing confirmation; failure is non-fatal
    async fn send_contact_confirmation(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), MailError>;

    async fn send_intake_notification(
        &self,
        submission: &NewPatientSubmission,
    ) -> Result<(), MailError>;

    async fn send_intake_confirmation(
        &self,
        submission: &NewPatientSubmission,
    ) -> Result<(), MailError>;
}

/// Production mailer over an SMTP relay (Gmail in the reference deployment)
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    operator: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .timeout(Some(config.send_timeout))
            .build();

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailError::Address(format!("EMAIL_FROM: {}", e)))?;
        let operator = config
            .operator_address
            .parse::<Mailbox>()
            .map_err(|e| MailError::Address(format!("EMAIL_TO: {}", e)))?;

        Ok(Self {
            transport,
            from,
            operator,
        })
    }

    fn submitter_mailbox(address: &str) -> Result<Mailbox, MailError> {
        address
            .parse::<Mailbox>()
            .map_err(|e| MailError::Address(format!("submitter address: {}", e)))
    }

    /// Human-readable submission timestamp for the operator emails
    fn submitted_at() -> String {
        Utc::now().format("%-d %B %Y %H:%M UTC").to_string()
    }

    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact_notification(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), MailError> {
        let html = templates::contact_notification(submission, &Self::submitted_at())?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.operator.clone())
            // Lets the clinic reply directly to the visitor
            .reply_to(Self::submitter_mailbox(&submission.email)?)
            .subject(format!(
                "New Contact Form Submission from {}",
                submission.full_name()
            ))
            .singlepart(SinglePart::html(html))
            .map_err(|e| MailError::Transport(e.to_string()))?;

        self.send(message).await
    }

    async fn send_contact_confirmation(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), MailError> {
        let html = templates::contact_confirmation(submission)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(Self::submitter_mailbox(&submission.email)?)
            .subject("Thank you for contacting Keystone Sports Therapy")
            .singlepart(SinglePart::html(html))
            .map_err(|e| MailError::Transport(e.to_string()))?;

        self.send(message).await
    }

    async fn send_intake_notification(
        &self,
        submission: &NewPatientSubmission,
    ) -> Result<(), MailError> {
        let html = templates::new_patient_notification(submission, &Self::submitted_at())?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.operator.clone())
            .reply_to(Self::submitter_mailbox(&submission.contact_email)?)
            .subject(format!("New Patient Form - {}", submission.name))
            .singlepart(SinglePart::html(html))
            .map_err(|e| MailError::Transport(e.to_string()))?;

        self.send(message).await
    }

    async fn send_intake_confirmation(
        &self,
        submission: &NewPatientSubmission,
    ) -> Result<(), MailError> {
        let html = templates::new_patient_confirmation(submission)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(Self::submitter_mailbox(&submission.contact_email)?)
            .subject("Thank you for your New Patient Form - Keystone Sports Therapy")
            .singlepart(SinglePart::html(html))
            .map_err(|e| MailError::Transport(e.to_string()))?;

        self.send(message).await
    }
}
