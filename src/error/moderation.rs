use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised when applying moderation actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModerationError {
    /// A timed action was given an expiry that has already passed.
    #[error("Expiry {0} is not in the future")]
    ExpiryInPast(DateTime<Utc>),
}
