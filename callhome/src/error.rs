//! Error types for the `healthcheck` command-line tool.
//!
//! Library errors are wrapped unchanged so `main` can print a single line
//! and choose the exit code.

use crate::action::ActionError;
use healthcheck::config::ConfigError;
use healthcheck::hotfix::HotfixError;
use thiserror::Error;

/// Errors that end a `healthcheck` command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The platform version could not be assessed.
    #[error(transparent)]
    Hotfix(#[from] HotfixError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Authentication did not produce an upload token.
    #[error("authentication failed: {0}")]
    Authentication(#[from] ActionError),

    /// No password was supplied on standard input.
    #[error("no password received on standard input")]
    MissingPassword,

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for CLI results.
pub type Result<T> = std::result::Result<T, CliError>;
