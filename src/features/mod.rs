pub mod contact;
pub mod intake;
