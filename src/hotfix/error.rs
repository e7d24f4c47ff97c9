//! Error types for platform version parsing and hotfix catalogue lookups.
//!
//! Parse failures carry the rejected input so callers can echo it back to the
//! user. Configuration failures indicate a defect in the catalogue table and
//! are rejected when the catalogue is built.

use thiserror::Error;

/// Reasons a platform version string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformVersionError {
    /// The input was empty or contained only whitespace.
    #[error("platform version must not be empty")]
    Empty,

    /// The input has more dotted components than a platform version allows.
    #[error("platform version \"{value}\" has {count} components; at most {max} are allowed")]
    TooManyComponents {
        /// The rejected version string.
        value: String,
        /// Number of components found.
        count: usize,
        /// Maximum number of components accepted.
        max: usize,
    },

    /// A component was empty, non-numeric, or too large.
    #[error("invalid component \"{component}\" in platform version \"{value}\"")]
    InvalidComponent {
        /// The rejected version string.
        value: String,
        /// The offending dotted component.
        component: String,
    },
}

/// Errors raised by the hotfix catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotfixError {
    /// The host reported a platform version that could not be parsed.
    #[error(transparent)]
    Parse(#[from] PlatformVersionError),

    /// The catalogue table is inconsistent (missing or duplicate entries, or
    /// out-of-order boundaries).
    #[error("hotfix catalogue misconfigured: {reason}")]
    Configuration {
        /// Description of the inconsistency.
        reason: String,
    },
}

/// Result type alias using [`HotfixError`].
pub type Result<T> = std::result::Result<T, HotfixError>;
