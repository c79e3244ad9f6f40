//! Route registration errors.

use thiserror::Error;

/// Reasons a route can be rejected at registration time.
///
/// A rejected registration leaves the route table unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// An identical (method, pattern) pair is already registered.
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: String, pattern: String },

    /// A parameter segment has an empty name, two parameters share a name,
    /// or a literal contains a query or fragment delimiter.
    #[error("malformed pattern {pattern:?}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// The method is empty or is not a valid HTTP token.
    #[error("invalid method {0:?}")]
    InvalidMethod(String),
}

impl RegistrationError {
    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
