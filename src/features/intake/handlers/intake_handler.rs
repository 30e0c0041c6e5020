use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::intake::dtos::NewPatientFormDto;
use crate::features::intake::services::IntakeService;
use crate::shared::types::SubmissionResponse;

/// Submit the new patient intake form
///
/// Public endpoint without rate limiting or bot verification; presence is
/// reported per field so the patient can see which answer is missing.
#[utoipa::path(
    post,
    path = "/api/new-patient",
    request_body = NewPatientFormDto,
    responses(
        (status = 200, description = "Submission accepted and dispatched", body = SubmissionResponse),
        (status = 400, description = "Validation failure naming the field", body = crate::shared::types::ErrorResponse),
        (status = 500, description = "Notification dispatch failure", body = crate::shared::types::ErrorResponse)
    ),
    tag = "intake"
)]
pub async fn submit_new_patient(
    State(service): State<Arc<IntakeService>>,
    AppJson(dto): AppJson<NewPatientFormDto>,
) -> Result<Json<SubmissionResponse>> {
    if let Some(field) = dto.missing_required_field() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let submission = dto.into_submission();
    service.dispatch(&submission).await?;

    tracing::info!(
        name = %submission.name,
        email = %submission.contact_email,
        "New patient form dispatched"
    );

    Ok(Json(SubmissionResponse::new(
        "New patient form submitted successfully",
    )))
}
