mod intake_handler;

pub use intake_handler::submit_new_patient;

// Re-export the utoipa path item for the OpenAPI document
pub use intake_handler::__path_submit_new_patient;
