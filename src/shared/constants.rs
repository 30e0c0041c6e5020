/// Maximum number of URL-like substrings tolerated in a free-text field
/// before the submission is rejected as likely spam
pub const MAX_MESSAGE_LINKS: usize = 3;

/// Number of leading user-agent characters mixed into the client identifier
pub const CLIENT_UA_PREFIX_LEN: usize = 20;

// =============================================================================
// RATE LIMIT POLICY TAGS
// =============================================================================

/// Tight window catching rapid-fire submissions
pub const RAPID_POLICY_TAG: &str = "rapid";

/// Looser window bounding sustained volume
pub const SUSTAINED_POLICY_TAG: &str = "sustained";
