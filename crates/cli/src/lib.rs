#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front end of the `burstlink` binary. It parses
//! the arguments, loads the endpoint and request, installs diagnostics and
//! runs one exchange through [`session::SessionCoordinator`]. The response is
//! written to standard output as lowercase hex.
//!
//! # Design
//!
//! The crate exposes [`run`] as the only entry point. It accepts an iterator
//! of arguments together with handles for standard output and error so tests
//! can drive it in-process. Argument parsing uses a `clap` builder command;
//! validation that needs more than one option lives in a separate step so the
//! exit code for usage errors stays `1` regardless of which check fails.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as non-zero exit codes.
//! - The peer is never trusted implicitly: either a trust store or
//!   `--insecure-accept-any-cert` must be given.
//!
//! # Errors
//!
//! Usage errors exit with `1`, unreadable inputs with `5`. Exchange outcomes
//! map through [`session::ExitCode`], or through
//! [`session::SessionStatus::legacy_code`] with `--legacy-exit-codes`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["burstlink", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8_lossy(&stdout).starts_with("burstlink "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::Write;

use logging::{LogInitError, init_tracing};
use session::{HasExitCode, SessionCoordinator, SessionResult, SessionTimeouts};
use transport::{TlsConnector, TransportProtocol};

mod args;
mod command;
mod error;
mod options;

pub use error::CliError;

use args::{ParsedArgs, parse_args};
use command::{PROGRAM_NAME, clap_command};
use options::ClientOptions;

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The function returns the process exit code that should be used by the
/// caller.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => report(&CliError::Usage(error), stderr),
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        let help = clap_command().render_help().to_string();
        return if stdout.write_all(help.as_bytes()).is_ok() {
            0
        } else {
            1
        };
    }

    if parsed.show_version {
        let banner = format!("{PROGRAM_NAME} {}\n", env!("CARGO_PKG_VERSION"));
        return if stdout.write_all(banner.as_bytes()).is_ok() {
            0
        } else {
            1
        };
    }

    let options = match ClientOptions::from_parsed(parsed) {
        Ok(options) => options,
        Err(error) => return report(&error, stderr),
    };

    match init_tracing(options.verbosity, &options.log_sink) {
        Ok(()) | Err(LogInitError::AlreadyInstalled(_)) => {}
        Err(error) => return report(&CliError::Logging(error), stderr),
    }

    let coordinator = build_coordinator(options.protocol, &options.timeouts);
    let result = coordinator.exchange(
        &options.endpoint,
        &options.policy,
        &options.request,
        options.timeouts.read_deadline(),
    );

    render_result(&result, options.legacy_exit_codes, stdout, stderr)
}

fn build_coordinator(
    protocol: TransportProtocol,
    timeouts: &SessionTimeouts,
) -> SessionCoordinator<TlsConnector> {
    SessionCoordinator::new(TlsConnector::new().with_protocol(protocol))
        .with_grace_period(timeouts.grace_period())
}

fn render_result<Out, Err>(
    result: &SessionResult,
    legacy_exit_codes: bool,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    Out: Write,
    Err: Write,
{
    if let Some(response) = result.response() {
        if writeln!(stdout, "{}", response.to_hex()).is_err() {
            return 1;
        }
    } else {
        let detail = result
            .failure()
            .map_or_else(String::new, |failure| format!(": {failure}"));
        let _ = writeln!(stderr, "{PROGRAM_NAME}: {}{detail}", result.status());
    }

    if legacy_exit_codes {
        result.status().legacy_code()
    } else {
        result.exit_code().as_i32()
    }
}

fn report<Err: Write>(error: &CliError, stderr: &mut Err) -> i32 {
    let _ = match error {
        CliError::Usage(usage) => write!(stderr, "{}", usage.render()),
        other => writeln!(stderr, "{PROGRAM_NAME}: {other}"),
    };
    error.exit_code().as_i32()
}

#[cfg(test)]
mod tests;
