//! Admission control for the public form endpoints
//!
//! A fixed-window counter store keyed by a derived client identifier, with
//! two independently configured policies layered on the contact endpoint
//! (a tight "rapid-fire" window and a looser "sustained" window) and a
//! periodic sweep bounding store growth.

mod identity;
mod limiter;
mod store;

pub use identity::client_identifier;
pub use limiter::{ContactAdmission, RateLimitPolicy, RateLimiter};
pub use store::{
    Clock, InMemoryRateLimitStore, RateLimitDecision, RateLimitEntry, RateLimitStore, SystemClock,
};
