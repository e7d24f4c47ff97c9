//! Call-home client for the health-check tools.
//!
//! Exchanges user credentials for an upload token through three chained
//! token services, optionally keeps the token as a pool secret, and hosts
//! the `healthcheck` command-line tool.
//!
//! # Modules
//!
//! - [`action`] - Authentication action with optional token persistence
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Subcommand implementations
//! - [`error`] - CLI error type
//! - [`exchange`] - Identity, grant, and upload token exchange
//! - [`output`] - Report formatting
//! - [`secret`] - Token persistence through a secret store

pub mod action;
pub mod cli;
pub mod commands;
pub mod error;
pub mod exchange;
pub mod output;
pub mod secret;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use action::{
    ActionError, AuthenticationAction, AuthenticationOutcome, PoolConfig, PoolConfigError,
    TokenPersistence,
};
pub use exchange::{Credentials, ExchangeError, TokenExchange, UploadToken};
pub use secret::{SecretError, SecretHandle, SecretStore, read_token_secret, set_token_secret};
