use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success envelope for the form submission endpoints.
///
/// The form endpoints deliberately return a flat `{success, message}` body;
/// rate-limit quota is exposed through `X-RateLimit-*` response headers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

impl SubmissionResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error envelope for the form submission endpoints.
///
/// `reset_time` is only present on 429 responses so the client can
/// self-schedule a retry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_time: Option<DateTime<Utc>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            reset_time: None,
        }
    }

    pub fn with_reset_time(error: impl Into<String>, reset_time: DateTime<Utc>) -> Self {
        Self {
            error: error.into(),
            reset_time: Some(reset_time),
        }
    }
}
