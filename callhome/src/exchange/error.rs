//! Error types for the token exchange.
//!
//! Every variant names the step at which the exchange stopped.

use super::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// The three steps of the exchange, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    /// Credentials are exchanged for an identity token.
    Identity,
    /// The identity token is exchanged for an upload grant token.
    Grant,
    /// The grant token is exchanged for an upload token.
    Upload,
}

impl StepName {
    /// Lower-case step name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Grant => "grant",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The request for a step failed.
    #[error("{step} token request failed: {source}")]
    Transport {
        /// The step whose request failed.
        step: StepName,
        /// The underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// A request body could not be encoded or a response was not a
    /// `{"Token": ...}` object.
    #[error("{step} token response is malformed: {reason}")]
    Serialization {
        /// The step whose payload was malformed.
        step: StepName,
        /// The JSON error message.
        reason: String,
    },

    /// The caller cancelled the exchange before the step was sent.
    #[error("token exchange cancelled before the {before} step")]
    Cancelled {
        /// The step that was not started.
        before: StepName,
    },
}

impl ExchangeError {
    /// The step at which the exchange stopped.
    #[must_use]
    pub fn step(&self) -> StepName {
        match self {
            Self::Transport { step, .. } | Self::Serialization { step, .. } => *step,
            Self::Cancelled { before } => *before,
        }
    }
}

/// Result type alias using [`ExchangeError`].
pub type Result<T> = std::result::Result<T, ExchangeError>;
