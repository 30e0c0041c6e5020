mod contact_handler;

pub use contact_handler::submit_contact;

// Re-export the utoipa path item for the OpenAPI document
pub use contact_handler::__path_submit_contact;
