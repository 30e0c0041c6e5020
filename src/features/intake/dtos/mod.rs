mod intake_dto;

pub use intake_dto::NewPatientFormDto;
