//! Implementations of the `healthcheck` subcommands.
//!
//! Each command takes its streams and collaborators as parameters so it can
//! run against buffers and fakes in tests.

use crate::action::{AuthenticationAction, AuthenticationOutcome};
use crate::cli::{AuthenticateArgs, HotfixArgs};
use crate::error::{CliError, Result};
use crate::exchange::{Credentials, Endpoints, TokenExchange, TokenExpiration, TokenTransport};
use crate::output::{HotfixReport, format_human, format_json, write_stderr_line};
use healthcheck::config::HealthCheckConfig;
use healthcheck::hotfix::HotfixCatalogue;
use std::io::{BufRead, Write};

/// Print whether the platform version in `args` needs a hotfix.
///
/// # Errors
///
/// Returns [`CliError::Hotfix`] if the version is malformed or the catalogue
/// is inconsistent, and [`CliError::Io`] if the report cannot be written.
pub fn hotfix(args: &HotfixArgs, stdout: &mut dyn Write) -> Result<()> {
    let catalogue = HotfixCatalogue::builtin()?;
    let assessment = catalogue.assess(&args.platform_version)?;
    let artifact = assessment
        .release()
        .map(|release| catalogue.artifact_for(release))
        .transpose()?;
    let report = HotfixReport::new(&args.platform_version, assessment, artifact);

    let text = if args.json {
        format_json(&report)
    } else {
        format_human(&report)
    };
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// Streams used by [`authenticate`].
pub struct Streams<'a> {
    /// Source of the password when `--password-stdin` is given.
    pub stdin: &'a mut dyn BufRead,
    /// Receives the upload token.
    pub stdout: &'a mut dyn Write,
    /// Receives progress messages.
    pub stderr: &'a mut dyn Write,
}

/// Exchange the credentials in `args` for an upload token and print it.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the configuration cannot be loaded,
/// [`CliError::MissingPassword`] if stdin yields no password,
/// [`CliError::Authentication`] if the exchange fails, and
/// [`CliError::Io`] on stream failures.
pub fn authenticate(
    args: &AuthenticateArgs,
    quiet: bool,
    transport: &dyn TokenTransport,
    streams: &mut Streams<'_>,
) -> Result<()> {
    let config = HealthCheckConfig::load(args.config.as_deref())?;
    let password = args
        .password
        .clone()
        .map_or_else(|| read_password(streams.stdin), Ok)?;
    let endpoints = Endpoints::from_config(&config.endpoints);
    let expiration =
        TokenExpiration::from_secs(args.expiration.unwrap_or(config.token_expiration));

    if !quiet {
        write_stderr_line(
            streams.stderr,
            format!("Requesting upload token for {}...", args.username),
        );
    }

    let exchange = TokenExchange::new(transport, &endpoints, expiration);
    let outcome =
        AuthenticationAction::new(exchange, Credentials::new(&args.username, password)).run();
    match outcome {
        AuthenticationOutcome::Authenticated { upload_token, .. } => {
            writeln!(streams.stdout, "{}", upload_token.as_str())?;
            if !quiet {
                write_stderr_line(streams.stderr, "Upload token obtained.");
            }
            Ok(())
        }
        AuthenticationOutcome::Failed { error } => Err(error.into()),
    }
}

fn read_password(stdin: &mut dyn BufRead) -> Result<String> {
    let mut line = String::new();
    stdin.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password.to_owned())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
