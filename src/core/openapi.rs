use utoipa::{Modify, OpenApi};

use crate::features::contact::{dtos as contact_dtos, handlers as contact_handlers};
use crate::features::intake::{dtos as intake_dtos, handlers as intake_handlers};
use crate::shared::types::{ErrorResponse, SubmissionResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Contact (public)
        contact_handlers::submit_contact,
        // New patient intake (public)
        intake_handlers::submit_new_patient,
    ),
    components(
        schemas(
            // Shared
            SubmissionResponse,
            ErrorResponse,
            // Contact
            contact_dtos::ContactFormDto,
            // Intake
            intake_dtos::NewPatientFormDto,
        )
    ),
    tags(
        (name = "contact", description = "General enquiry form (public, rate limited)"),
        (name = "intake", description = "New patient intake form (public)"),
    ),
    info(
        title = "Keystone Clinic API",
        version = "0.1.0",
        description = "Form submission API for the Keystone Sports Therapy website",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
