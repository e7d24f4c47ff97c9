//! `healthcheck` command-line entrypoint.
//!
//! Checks platform versions against the hotfix catalogue and obtains
//! call-home upload tokens. Reports go to stdout; progress and errors go to
//! stderr.

use clap::Parser;
use healthcheck_callhome::cli::{Cli, Command};
use healthcheck_callhome::commands::{self, Streams};
use healthcheck_callhome::error::Result;
use healthcheck_callhome::exchange::HttpTransport;
use healthcheck_callhome::output::write_stderr_line;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Command::Hotfix(args) => commands::hotfix(args, &mut stdout),
        Command::Authenticate(args) => {
            let mut stdin = std::io::stdin().lock();
            commands::authenticate(
                args,
                cli.quiet,
                &HttpTransport,
                &mut Streams {
                    stdin: &mut stdin,
                    stdout: &mut stdout,
                    stderr,
                },
            )
        }
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthcheck_callhome::error::CliError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(CliError::MissingPassword), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(stderr_text, "no password received on standard input\n");
    }
}
