use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::MAX_MESSAGE_LINKS;

lazy_static! {
    /// Regex for counting URL-like substrings in free text
    /// Matches both schemed links and bare "www." hosts:
    /// - "https://example.com/page", "http://a.b"
    /// - "www.example.com"
    pub static ref URL_REGEX: Regex =
        Regex::new(r"(?i)\bhttps?://\S+|\bwww\.\S+").unwrap();
}

/// Count URL-like substrings embedded in `text`
pub fn count_links(text: &str) -> usize {
    URL_REGEX.find_iter(text).count()
}

/// Validator hook: individual links are tolerated, but more than
/// `MAX_MESSAGE_LINKS` of them marks the submission as likely spam
pub fn validate_link_count(text: &str) -> Result<(), ValidationError> {
    if count_links(text) > MAX_MESSAGE_LINKS {
        return Err(ValidationError::new("too_many_links")
            .with_message("Message contains too many links".into()));
    }
    Ok(())
}
