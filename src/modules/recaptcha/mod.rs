//! Server-side reCAPTCHA v3 verification
//!
//! The client obtains a one-time action token and forwards it with the form;
//! the server redeems it against the provider's siteverify API. Any failure
//! along the way (missing secret, network error, timeout, provider rejection,
//! low score) verifies as `false` — fail closed, never open.

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::RecaptchaConfig;

/// Raw siteverify response
#[derive(Debug, Deserialize)]
pub struct SiteVerifyResponse {
    pub success: bool,
    /// Continuous bot-likelihood estimate in [0,1]; 1.0 is very likely human
    pub score: Option<f64>,
    pub action: Option<String>,
    pub hostname: Option<String>,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

/// Seam for the contact pipeline so endpoint tests can stub verification
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> bool;
}

pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret_key: Option<String>,
    verify_url: String,
    min_score: f64,
}

impl RecaptchaVerifier {
    pub fn new(config: &RecaptchaConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("Failed to build HTTP client"),
            secret_key: config.secret_key.clone(),
            verify_url: config.verify_url.clone(),
            min_score: config.min_score,
        }
    }

    /// Admission requires both the boolean success flag and an acceptable
    /// score; an absent score counts as 0.0
    fn accepts(&self, verdict: &SiteVerifyResponse) -> bool {
        verdict.success && verdict.score.unwrap_or(0.0) >= self.min_score
    }
}

#[async_trait]
impl TokenVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str) -> bool {
        let Some(secret) = self.secret_key.as_deref() else {
            tracing::error!("RECAPTCHA_SECRET_KEY is not set");
            return false;
        };

        if token.is_empty() {
            return false;
        }

        let params = [("secret", secret), ("response", token)];
        let response = match self.client.post(&self.verify_url).form(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("reCAPTCHA verification request failed: {:?}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("reCAPTCHA siteverify returned status: {}", response.status());
            return false;
        }

        let verdict: SiteVerifyResponse = match response.json().await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!("Failed to parse siteverify response: {:?}", e);
                return false;
            }
        };

        if !verdict.error_codes.is_empty() {
            tracing::warn!("reCAPTCHA error codes: {:?}", verdict.error_codes);
        }

        self.accepts(&verdict)
    }
}
