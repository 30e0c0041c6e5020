//! Shared stubs for unit and endpoint tests.
//!
//! Compiled only for tests; production wiring uses the real clock, SMTP
//! mailer and reCAPTCHA verifier.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::modules::mail::{ContactSubmission, MailError, Mailer, NewPatientSubmission};
use crate::modules::rate_limit::Clock;
use crate::modules::recaptcha::TokenVerifier;

/// Deterministic clock advanced explicitly by tests
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Mailer stub counting sends per email kind, with switchable failures
#[derive(Default)]
pub struct StubMailer {
    contact_notifications: AtomicUsize,
    contact_confirmations: AtomicUsize,
    intake_notifications: AtomicUsize,
    intake_confirmations: AtomicUsize,
    fail_notifications: AtomicBool,
    fail_confirmations: AtomicBool,
}

impl StubMailer {
    pub fn contact_notifications(&self) -> usize {
        self.contact_notifications.load(Ordering::SeqCst)
    }

    pub fn contact_confirmations(&self) -> usize {
        self.contact_confirmations.load(Ordering::SeqCst)
    }

    pub fn intake_notifications(&self) -> usize {
        self.intake_notifications.load(Ordering::SeqCst)
    }

    pub fn intake_confirmations(&self) -> usize {
        self.intake_confirmations.load(Ordering::SeqCst)
    }

    pub fn total_sends(&self) -> usize {
        self.contact_notifications()
            + self.contact_confirmations()
            + self.intake_notifications()
            + self.intake_confirmations()
    }

    /// Make every notification send fail from now on
    pub fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// Make every confirmation send fail from now on
    pub fn fail_confirmations(&self, fail: bool) {
        self.fail_confirmations.store(fail, Ordering::SeqCst);
    }

    fn notification_outcome(&self, counter: &AtomicUsize) -> Result<(), MailError> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(MailError::Transport("stubbed notification failure".into()));
        }
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn confirmation_outcome(&self, counter: &AtomicUsize) -> Result<(), MailError> {
        if self.fail_confirmations.load(Ordering::SeqCst) {
            return Err(MailError::Transport("stubbed confirmation failure".into()));
        }
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send_contact_notification(
        &self,
        _submission: &ContactSubmission,
    ) -> Result<(), MailError> {
        self.notification_outcome(&self.contact_notifications)
    }

    async fn send_contact_confirmation(
        &self,
        _submission: &ContactSubmission,
    ) -> Result<(), MailError> {
        self.confirmation_outcome(&self.contact_confirmations)
    }

    async fn send_intake_notification(
        &self,
        _submission: &NewPatientSubmission,
    ) -> Result<(), MailError> {
        self.notification_outcome(&self.intake_notifications)
    }

    async fn send_intake_confirmation(
        &self,
        _submission: &NewPatientSubmission,
    ) -> Result<(), MailError> {
        self.confirmation_outcome(&self.intake_confirmations)
    }
}

/// Verifier stub with a fixed verdict and a call counter
pub struct StubVerifier {
    verdict: AtomicBool,
    calls: AtomicUsize,
}

impl StubVerifier {
    pub fn passing() -> Self {
        Self {
            verdict: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_verdict(&self, verdict: bool) {
        self.verdict.store(verdict, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, _token: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict.load(Ordering::SeqCst)
    }
}
