use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::intake::handlers;
use crate::features::intake::services::IntakeService;

/// Create routes for the new patient intake feature
///
/// Note: This endpoint is public and, unlike the contact form, carries no
/// rate limiting or captcha.
// TODO: confirm with the clinic whether the intake form should share the
// contact form's admission pipeline
pub fn routes(service: Arc<IntakeService>) -> Router {
    Router::new()
        .route("/api/new-patient", post(handlers::submit_new_patient))
        .with_state(service)
}
