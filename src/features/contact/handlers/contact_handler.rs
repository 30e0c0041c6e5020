use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use validator::Validate;

use crate::core::error::{insert_rate_limit_header, AppError, Result};
use crate::features::contact::dtos::ContactFormDto;
use crate::features::contact::services::ContactService;
use crate::modules::rate_limit::{client_identifier, ContactAdmission};
use crate::shared::types::SubmissionResponse;

/// Submit the general contact form
///
/// Public endpoint. Requests pass through client identification, two-tier
/// rate limiting, validation, bot mitigation and notification dispatch, in
/// that order, with the first failure short-circuiting.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactFormDto,
    responses(
        (status = 200, description = "Submission accepted and dispatched", body = SubmissionResponse),
        (status = 400, description = "Validation or bot-verification failure", body = crate::shared::types::ErrorResponse),
        (status = 429, description = "Rate limit exceeded; body carries resetTime", body = crate::shared::types::ErrorResponse),
        (status = 500, description = "Notification dispatch failure", body = crate::shared::types::ErrorResponse)
    ),
    tag = "contact"
)]
pub async fn submit_contact(
    State(service): State<Arc<ContactService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    // Admission control runs before body parsing so a throttled client
    // always sees 429, whatever it sent
    let identifier = client_identifier(&headers);
    let admission = service.admit(&identifier)?;

    let dto: ContactFormDto = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON data: {}", e)))?;

    if !dto.has_required_fields() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if dto.honeypot_triggered() {
        // Silently succeed without any side effect, denying the bot
        // useful feedback
        tracing::info!(identifier = %identifier, "Honeypot triggered, discarding submission");
        return Ok(success_response(&admission));
    }

    // Token absence is a validation failure distinct from a failed
    // verification
    let token = dto.recaptcha_token.clone().unwrap_or_default();
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Validation(
            "reCAPTCHA token is required".to_string(),
        ));
    }
    if !service.verify_token(token).await {
        return Err(AppError::Validation(
            "reCAPTCHA verification failed. Please try again.".to_string(),
        ));
    }

    let submission = dto.into_submission();
    service.dispatch(&submission).await?;

    tracing::info!(
        name = %submission.full_name(),
        email = %submission.email,
        "Contact form submission dispatched"
    );

    Ok(success_response(&admission))
}

/// 200 response echoing the remaining quota of both tiers
fn success_response(admission: &ContactAdmission) -> Response {
    let mut response =
        Json(SubmissionResponse::new("Contact form submitted successfully")).into_response();

    let headers = response.headers_mut();
    insert_rate_limit_header(headers, "Rapid", "Limit", admission.rapid.limit);
    insert_rate_limit_header(headers, "Rapid", "Remaining", admission.rapid.remaining);
    insert_rate_limit_header(headers, "Sustained", "Limit", admission.sustained.limit);
    insert_rate_limit_header(headers, "Sustained", "Remaining", admission.sustained.remaining);

    response
}
