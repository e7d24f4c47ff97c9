//! CLI argument definitions for the `healthcheck` tool.
//!
//! Kept apart from the binary so parsing can be tested without running a
//! command.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Check hosts for required hotfixes and obtain call-home upload tokens.
#[derive(Parser, Debug)]
#[command(name = "healthcheck")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Check whether a host on platform 2.1.1 needs a hotfix:\n",
    "    $ healthcheck hotfix 2.1.1\n\n",
    "  Obtain an upload token, reading the password from stdin:\n",
    "    $ echo \"$PASSWORD\" | healthcheck authenticate --username alice --password-stdin",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Report whether a platform version needs a hotfix.
    Hotfix(HotfixArgs),

    /// Exchange credentials for an upload token.
    Authenticate(AuthenticateArgs),
}

/// Arguments for the hotfix command.
#[derive(Args, Debug, Clone, Default)]
pub struct HotfixArgs {
    /// Platform version of the host, e.g. `2.1.1`.
    #[arg(value_name = "PLATFORM_VERSION")]
    pub platform_version: String,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the authenticate command.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthenticateArgs {
    /// Account name for the identity service.
    #[arg(short, long, value_name = "NAME")]
    pub username: String,

    /// Password for the identity service (visible in process listings).
    #[arg(long, value_name = "PASSWORD", conflicts_with = "password_stdin")]
    pub password: Option<String>,

    /// Read the password from the first line of standard input.
    #[arg(long, required_unless_present = "password")]
    pub password_stdin: bool,

    /// Requested token lifetime in seconds [default: from configuration].
    #[arg(long, value_name = "SECS")]
    pub expiration: Option<u64>,

    /// Configuration file [default: platform-specific].
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
