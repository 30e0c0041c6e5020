pub mod mail;
pub mod rate_limit;
pub mod recaptcha;
